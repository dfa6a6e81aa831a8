use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;

pub async fn delete_school(
    service: &SchoolService,
    school_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    match storage.delete_school(school_id).await {
        Ok(true) => {
            tracing::info!("School {} deleted", school_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("School deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SchoolNotFound,
            "School not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("School deletion failed: {e}"),
            )),
        ),
    }
}
