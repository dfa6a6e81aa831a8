use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    match storage.delete_student(id).await {
        Ok(true) => Ok(
            HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")),
        ),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete student: {e}"),
            )),
        ),
    }
}
