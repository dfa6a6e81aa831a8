//! 学期服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, not_found, resolve_school_scope,
    storage_error, storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    terms::{
        requests::{CreateTermRequest, TermQuery, UpdateTermRequest},
        responses::TermListResponse,
    },
};
use crate::respond_on_err;
use crate::storage::Storage;
use crate::utils::validate::validate_date;

pub struct TermService {
    storage: Option<Arc<dyn Storage>>,
}

/// 校验日期格式以及开始日期不晚于结束日期
fn check_date_range(start_date: &str, end_date: &str) -> Outcome<()> {
    let start = validate_date(start_date).map_err(|msg| bad_request(&msg))?;
    let end = validate_date(end_date).map_err(|msg| bad_request(&msg))?;
    if start > end {
        return Err(bad_request("Term start_date must not be after end_date"));
    }
    Ok(())
}

fn check_year(year: i32) -> Outcome<()> {
    if !(1900..=2200).contains(&year) {
        return Err(bad_request("Term year is out of range"));
    }
    Ok(())
}

impl TermService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_terms(
        &self,
        request: &HttpRequest,
        mut query: TermQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        query.school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

        match storage.list_terms(query).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                TermListResponse { items },
                "Term list retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve term list: {e}"),
                )),
            ),
        }
    }

    pub async fn create_term(
        &self,
        request: &HttpRequest,
        mut term_data: CreateTermRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        term_data.name = term_data.name.trim().to_string();
        if term_data.name.is_empty() {
            return Ok(bad_request("Term name must not be empty"));
        }
        respond_on_err!(check_year(term_data.year));
        respond_on_err!(check_date_range(&term_data.start_date, &term_data.end_date));

        match storage.create_term(term_data).await {
            Ok(term) => Ok(HttpResponse::Created()
                .json(ApiResponse::success(term, "Term created successfully"))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TermAlreadyExists,
                "Term creation failed",
            )),
        }
    }

    pub async fn get_term(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        match storage.get_term_by_id(id).await {
            Ok(Some(term)) => {
                respond_on_err!(ensure_school_access(&user, term.school_id));
                Ok(HttpResponse::Ok().json(ApiResponse::success(term, "Term retrieved successfully")))
            }
            Ok(None) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get term: {e}"),
                )),
            ),
        }
    }

    pub async fn update_term(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateTermRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        let existing = match storage.get_term_by_id(id).await {
            Ok(Some(term)) => term,
            Ok(None) => return Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => return Ok(storage_error(e, ErrorCode::TermAlreadyExists, "Failed to update term")),
        };

        if let Some(ref name) = update_data.name
            && name.trim().is_empty()
        {
            return Ok(bad_request("Term name must not be empty"));
        }
        if let Some(year) = update_data.year {
            respond_on_err!(check_year(year));
        }

        // 与未修改的一端组合后校验日期区间
        let start_date = update_data
            .start_date
            .as_deref()
            .unwrap_or(&existing.start_date);
        let end_date = update_data.end_date.as_deref().unwrap_or(&existing.end_date);
        respond_on_err!(check_date_range(start_date, end_date));

        match storage.update_term(id, update_data).await {
            Ok(Some(term)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(term, "Term updated successfully"))),
            Ok(None) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TermAlreadyExists,
                "Failed to update term",
            )),
        }
    }

    pub async fn delete_term(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_term(id).await {
            Ok(true) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Term deleted successfully")))
            }
            Ok(false) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => Ok(storage_error(e, ErrorCode::Conflict, "Failed to delete term")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range() {
        assert!(check_date_range("2024-01-08", "2024-04-05").is_ok());
        assert!(check_date_range("2024-04-05", "2024-04-05").is_ok());
        assert!(check_date_range("2024-04-06", "2024-04-05").is_err());
        assert!(check_date_range("2024-13-01", "2024-12-01").is_err());
    }

    #[test]
    fn test_year_range() {
        assert!(check_year(2024).is_ok());
        assert!(check_year(0).is_err());
    }
}
