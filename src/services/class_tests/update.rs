use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassTestService, load_test_for_write};
use crate::models::{ApiResponse, ErrorCode, class_tests::requests::UpdateTestRequest};
use crate::respond_on_err;
use crate::services::{bad_request, current_user, not_found, storage_error};
use crate::utils::validate::{validate_date, validate_max_score};

pub async fn update_test(
    service: &ClassTestService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateTestRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let test = respond_on_err!(load_test_for_write(&storage, &user, id).await);

    if let Some(ref title) = update_data.title
        && title.trim().is_empty()
    {
        return Ok(bad_request("Test title must not be empty"));
    }
    if let Some(ref date) = update_data.test_date
        && let Err(msg) = validate_date(date)
    {
        return Ok(bad_request(&msg));
    }
    if let Some(term_id) = update_data.term_id {
        match storage.get_term_by_id(term_id).await {
            Ok(Some(term)) if term.school_id == test.school_id => {}
            Ok(Some(_)) => return Ok(bad_request("Term belongs to a different school")),
            Ok(None) => return Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => return Ok(storage_error(e, ErrorCode::TermNotFound, "Failed to load term")),
        }
    }

    if let Some(max_score) = update_data.max_score {
        if let Err(msg) = validate_max_score(max_score) {
            return Ok(bad_request(msg));
        }
        // 新满分不能低于已录入的最高分
        let recorded = match storage.list_test_results(test.id).await {
            Ok(results) => results,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TestResultNotFound,
                    "Failed to load test results",
                ));
            }
        };
        if recorded.iter().any(|r| r.score > max_score) {
            return Ok(bad_request(
                "max_score is lower than an already recorded score",
            ));
        }
    }

    match storage.update_test(id, update_data).await {
        Ok(Some(test)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(test, "Test updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::TestNotFound, "Test not found")),
        Err(e) => Ok(storage_error(e, ErrorCode::Conflict, "Failed to update test")),
    }
}
