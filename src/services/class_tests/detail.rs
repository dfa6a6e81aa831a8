use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassTestService, load_test_for_read};
use crate::models::ApiResponse;
use crate::respond_on_err;
use crate::services::current_user;

pub async fn get_test(
    service: &ClassTestService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let test = respond_on_err!(load_test_for_read(&storage, &user, id).await);

    Ok(HttpResponse::Ok().json(ApiResponse::success(test, "Test retrieved successfully")))
}
