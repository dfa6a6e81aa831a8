use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{StudentListQuery, StudentQueryParams},
};
use crate::respond_on_err;
use crate::services::{current_user, resolve_school_scope};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));
    let school_id = respond_on_err!(resolve_school_scope(&user, None));

    let list_query = StudentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        school_id,
        class_id: query.class_id,
        stream_id: query.stream_id,
        search: query.search,
    };

    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve student list: {e}"),
            )),
        ),
    }
}
