use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, ensure_class_teacher};
use crate::models::{ApiResponse, ErrorCode, classes::requests::CreateClassRequest};
use crate::respond_on_err;
use crate::services::{bad_request, storage_error};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    class_data.name = class_data.name.trim().to_string();
    if class_data.name.is_empty() {
        return Ok(bad_request("Class name must not be empty"));
    }
    if class_data.level < 1 {
        return Ok(bad_request("Class level must be a positive integer"));
    }

    if let Some(teacher_id) = class_data.class_teacher_id {
        respond_on_err!(ensure_class_teacher(&storage, class_data.school_id, teacher_id).await);
    }

    match storage.create_class(class_data).await {
        Ok(class) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(class, "Class created successfully"))),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::ClassAlreadyExists,
            "Class creation failed",
        )),
    }
}
