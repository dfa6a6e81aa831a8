//! 班级分流（同一年级班级下的平行小班）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    streams::{
        requests::{CreateStreamRequest, UpdateStreamRequest},
        responses::StreamListResponse,
    },
};
use crate::respond_on_err;
use crate::services::{Outcome, bad_request, not_found, storage_error};
use crate::storage::Storage;

fn normalized_name(name: &str) -> Outcome<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(bad_request("Stream name must not be empty"));
    }
    Ok(name.to_string())
}

// 分流必须存在且属于路径中的班级
async fn ensure_stream_in_class(
    storage: &std::sync::Arc<dyn Storage>,
    class_id: i64,
    stream_id: i64,
) -> Outcome<()> {
    match storage.get_stream_by_id(stream_id).await {
        Ok(Some(stream)) if stream.class_id == class_id => Ok(()),
        Ok(_) => Err(not_found(ErrorCode::StreamNotFound, "Stream not found")),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::StreamAlreadyExists,
            "Failed to load stream",
        )),
    }
}

pub async fn list_streams(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    match storage.list_streams_by_class(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StreamListResponse { items },
            "Stream list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve stream list: {e}"),
            )),
        ),
    }
}

pub async fn create_stream(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    stream_data: CreateStreamRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let name = respond_on_err!(normalized_name(&stream_data.name));

    match storage.create_stream(class_id, &name).await {
        Ok(stream) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(stream, "Stream created successfully"))),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::StreamAlreadyExists,
            "Stream creation failed",
        )),
    }
}

pub async fn update_stream(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    stream_id: i64,
    stream_data: UpdateStreamRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let name = respond_on_err!(normalized_name(&stream_data.name));
    respond_on_err!(ensure_stream_in_class(&storage, class_id, stream_id).await);

    match storage.update_stream(stream_id, &name).await {
        Ok(Some(stream)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(stream, "Stream updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::StreamNotFound, "Stream not found")),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::StreamAlreadyExists,
            "Stream update failed",
        )),
    }
}

pub async fn delete_stream(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    stream_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    respond_on_err!(ensure_stream_in_class(&storage, class_id, stream_id).await);

    match storage.delete_stream(stream_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Stream deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StreamNotFound, "Stream not found")),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete stream: {e}"),
            )),
        ),
    }
}
