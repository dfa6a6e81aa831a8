use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassTestService;
use crate::models::{
    ApiResponse, ErrorCode,
    class_tests::requests::{TestListQuery, TestQueryParams},
};
use crate::respond_on_err;
use crate::services::{current_user, not_found, resolve_school_scope, storage_error};

pub async fn list_tests(
    service: &ClassTestService,
    request: &HttpRequest,
    query: TestQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));
    let school_id = respond_on_err!(resolve_school_scope(&user, None));

    let mut list_query = TestListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        school_id,
        class_id: query.class_id,
        subject_id: query.subject_id,
        teacher_id: query.teacher_id,
        term_id: query.term_id,
    };

    // 学生只能看到本班测验
    if user.is_student() {
        match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => list_query.class_id = Some(student.class_id),
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::StudentNotFound,
                    "No student record is linked to this account",
                ));
            }
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load student record",
                ));
            }
        }
    }

    match storage.list_tests_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Test list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve test list: {e}"),
            )),
        ),
    }
}
