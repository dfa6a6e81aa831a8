use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode, schools::requests::CreateSchoolRequest};
use crate::services::{Outcome, bad_request, storage_error};
use crate::storage::Storage;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::validate_school_code;
use crate::respond_on_err;

const GENERATED_CODE_LEN: usize = 6;
const MAX_CODE_ATTEMPTS: usize = 5;

// 生成未被占用的学校编码
async fn generate_unique_code(storage: &Arc<dyn Storage>) -> Outcome<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_random_code(GENERATED_CODE_LEN);
        match storage.get_school_by_code(&code).await {
            Ok(None) => return Ok(code),
            Ok(Some(_)) => continue,
            Err(e) => {
                return Err(storage_error(
                    e,
                    ErrorCode::SchoolAlreadyExists,
                    "School code generation failed",
                ));
            }
        }
    }

    Err(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Unable to generate a unique school code",
    )))
}

pub async fn create_school(
    service: &SchoolService,
    mut school_data: CreateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    school_data.name = school_data.name.trim().to_string();
    if school_data.name.is_empty() {
        return Ok(bad_request("School name must not be empty"));
    }

    let code = match school_data.code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_uppercase();
            if let Err(msg) = validate_school_code(&code) {
                return Ok(bad_request(msg));
            }
            code
        }
        _ => respond_on_err!(generate_unique_code(&storage).await),
    };
    school_data.code = Some(code);

    match storage.create_school(school_data).await {
        Ok(school) => {
            tracing::info!("School {} ({}) created", school.name, school.code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(school, "School created successfully")))
        }
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::SchoolAlreadyExists,
            "School creation failed",
        )),
    }
}
