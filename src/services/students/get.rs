use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;
use crate::services::{current_user, ensure_school_access, forbidden, not_found};

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let student = match storage.get_student_by_id(id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get student: {e}"),
                )),
            );
        }
    };

    // 学生只能查看自己的档案
    if user.is_student() && student.user_id != Some(user.id) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Students can only view their own record",
        ));
    }
    respond_on_err!(ensure_school_access(&user, student.school_id));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Student retrieved successfully",
    )))
}

pub async fn get_my_student(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::StudentNotFound,
            "No student record is linked to this account",
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get student: {e}"),
            )),
        ),
    }
}
