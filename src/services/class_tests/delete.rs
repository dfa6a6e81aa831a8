use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassTestService, load_test_for_write};
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;
use crate::services::{current_user, not_found};

pub async fn delete_test(
    service: &ClassTestService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    respond_on_err!(load_test_for_write(&storage, &user, id).await);

    match storage.delete_test(id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Test deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TestNotFound, "Test not found")),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete test: {e}"),
            )),
        ),
    }
}
