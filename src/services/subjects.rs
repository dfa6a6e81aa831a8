use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, not_found, resolve_school_scope,
    storage_error, storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::requests::{
        CreateSubjectRequest, SubjectListQuery, SubjectQueryParams, UpdateSubjectRequest,
    },
};
use crate::respond_on_err;
use crate::storage::Storage;

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

// 科目代码统一为大写
fn normalize_code(code: &str) -> Outcome<String> {
    let code = code.trim().to_uppercase();
    if code.is_empty() || code.len() > 16 {
        return Err(bad_request("Subject code must be 1-16 characters"));
    }
    Ok(code)
}

fn normalize_name(name: &str) -> Outcome<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(bad_request("Subject name must not be empty"));
    }
    Ok(name.to_string())
}

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        query: SubjectQueryParams,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        let school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

        let list_query = SubjectListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            school_id,
            search: query.search,
        };

        match storage.list_subjects_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Subject list retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve subject list: {e}"),
                )),
            ),
        }
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        mut subject_data: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        subject_data.name = respond_on_err!(normalize_name(&subject_data.name));
        subject_data.code = respond_on_err!(normalize_code(&subject_data.code));

        match storage.create_subject(subject_data).await {
            Ok(subject) => Ok(HttpResponse::Created()
                .json(ApiResponse::success(subject, "Subject created successfully"))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::SubjectAlreadyExists,
                "Subject creation failed",
            )),
        }
    }

    pub async fn get_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        match storage.get_subject_by_id(id).await {
            Ok(Some(subject)) => {
                respond_on_err!(ensure_school_access(&user, subject.school_id));
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    subject,
                    "Subject retrieved successfully",
                )))
            }
            Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get subject: {e}"),
                )),
            ),
        }
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        id: i64,
        mut update_data: UpdateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        if let Some(name) = update_data.name.as_deref() {
            update_data.name = Some(respond_on_err!(normalize_name(name)));
        }
        if let Some(code) = update_data.code.as_deref() {
            update_data.code = Some(respond_on_err!(normalize_code(code)));
        }

        match storage.update_subject(id, update_data).await {
            Ok(Some(subject)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(subject, "Subject updated successfully"))),
            Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::SubjectAlreadyExists,
                "Failed to update subject",
            )),
        }
    }

    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_subject(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Subject deleted successfully"))),
            Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete subject: {e}"),
                )),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_code_is_uppercased() {
        assert_eq!(normalize_code(" mat101 ").ok().as_deref(), Some("MAT101"));
        assert!(normalize_code("   ").is_err());
        assert!(normalize_code(&"X".repeat(17)).is_err());
    }
}
