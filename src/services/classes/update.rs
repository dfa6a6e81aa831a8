use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, ensure_class_teacher};
use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::respond_on_err;
use crate::services::{bad_request, not_found, storage_error};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    if let Some(ref name) = update_data.name
        && name.trim().is_empty()
    {
        return Ok(bad_request("Class name must not be empty"));
    }
    if let Some(level) = update_data.level
        && level < 1
    {
        return Ok(bad_request("Class level must be a positive integer"));
    }

    if let Some(teacher_id) = update_data.class_teacher_id {
        let class = match storage.get_class_by_id(class_id).await {
            Ok(Some(class)) => class,
            Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::ClassAlreadyExists,
                    "Failed to update class",
                ));
            }
        };
        respond_on_err!(ensure_class_teacher(&storage, class.school_id, teacher_id).await);
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::ClassAlreadyExists,
            "Failed to update class",
        )),
    }
}
