use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{
    ApiResponse, ErrorCode,
    schools::requests::{SchoolListQuery, SchoolQueryParams},
};
use crate::respond_on_err;
use crate::services::{current_user, resolve_school_scope};

pub async fn list_schools(
    service: &SchoolService,
    query: SchoolQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    // 非管理员只能看到自己的学校
    let only_id = respond_on_err!(resolve_school_scope(&user, None));

    let list_query = SchoolListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        only_id,
        search: query.search,
    };

    match storage.list_schools_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "School list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve school list: {e}"),
            )),
        ),
    }
}
