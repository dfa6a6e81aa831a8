use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;
use crate::services::{current_user, ensure_school_access};

pub async fn get_school(
    service: &SchoolService,
    school_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));
    respond_on_err!(ensure_school_access(&user, school_id));

    match storage.get_school_by_id(school_id).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            school,
            "School retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SchoolNotFound,
            "School not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve school: {e}"),
            )),
        ),
    }
}
