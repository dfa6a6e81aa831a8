use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode, schools::requests::UpdateSchoolRequest};
use crate::respond_on_err;
use crate::services::{bad_request, storage_error};
use crate::utils::validate::validate_school_code;

pub async fn update_school(
    service: &SchoolService,
    school_id: i64,
    mut update_data: UpdateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    if let Some(ref name) = update_data.name
        && name.trim().is_empty()
    {
        return Ok(bad_request("School name must not be empty"));
    }

    if let Some(code) = update_data.code.take() {
        let code = code.trim().to_uppercase();
        if let Err(msg) = validate_school_code(&code) {
            return Ok(bad_request(msg));
        }
        update_data.code = Some(code);
    }

    match storage.update_school(school_id, update_data).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            school,
            "School updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SchoolNotFound,
            "School not found",
        ))),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::SchoolAlreadyExists,
            "School update failed",
        )),
    }
}
