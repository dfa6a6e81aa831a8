use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::{ClassListQuery, ClassQueryParams},
};
use crate::respond_on_err;
use crate::services::{current_user, resolve_school_scope};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    // 教师和学生只能查看本校班级
    let school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        school_id,
        search: query.search,
    };

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve class list: {e}"),
            )),
        ),
    }
}
