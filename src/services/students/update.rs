use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, ensure_student_account, resolve_placement, validate_birth_date};
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::respond_on_err;
use crate::services::{bad_request, not_found, storage_error};

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    let existing = match storage.get_student_by_id(id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::StudentAlreadyExists,
                "Failed to update student",
            ));
        }
    };

    for value in [
        &update_data.admission_number,
        &update_data.first_name,
        &update_data.last_name,
    ]
    .into_iter()
    .flatten()
    {
        if value.trim().is_empty() {
            return Ok(bad_request("Student fields must not be empty"));
        }
    }
    respond_on_err!(validate_birth_date(update_data.date_of_birth.as_deref()));

    // 按更新后的班级与分流重新校验
    if update_data.class_id.is_some() || update_data.stream_id.is_some() {
        let class_id = update_data.class_id.unwrap_or(existing.class_id);
        let stream_id = update_data.stream_id.or(existing.stream_id);
        let class = respond_on_err!(resolve_placement(&storage, class_id, stream_id).await);
        if class.school_id != existing.school_id {
            return Ok(bad_request("Student cannot be moved to another school"));
        }
    }

    if let Some(user_id) = update_data.user_id {
        respond_on_err!(ensure_student_account(&storage, user_id).await);
    }

    match storage.update_student(id, update_data).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(student, "Student updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::StudentAlreadyExists,
            "Failed to update student",
        )),
    }
}
