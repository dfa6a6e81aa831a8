pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod streams;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{Outcome, bad_request, storage_error, storage_from_request};
use crate::models::ErrorCode;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::streams::requests::{CreateStreamRequest, UpdateStreamRequest};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    // 根据班级 ID 获取班级信息
    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    // 更新班级信息
    pub async fn update_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, req, class_id, update_data).await
    }

    // 根据班级 ID 删除班级
    pub async fn delete_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, req, class_id).await
    }

    // 分流
    pub async fn list_streams(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        streams::list_streams(self, req, class_id).await
    }

    pub async fn create_stream(
        &self,
        req: &HttpRequest,
        class_id: i64,
        stream_data: CreateStreamRequest,
    ) -> ActixResult<HttpResponse> {
        streams::create_stream(self, req, class_id, stream_data).await
    }

    pub async fn update_stream(
        &self,
        req: &HttpRequest,
        class_id: i64,
        stream_id: i64,
        stream_data: UpdateStreamRequest,
    ) -> ActixResult<HttpResponse> {
        streams::update_stream(self, req, class_id, stream_id, stream_data).await
    }

    pub async fn delete_stream(
        &self,
        req: &HttpRequest,
        class_id: i64,
        stream_id: i64,
    ) -> ActixResult<HttpResponse> {
        streams::delete_stream(self, req, class_id, stream_id).await
    }
}

/// 班主任必须是同校教师
pub(crate) async fn ensure_class_teacher(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    teacher_id: i64,
) -> Outcome<()> {
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) if teacher.school_id == school_id => Ok(()),
        Ok(_) => Err(bad_request("Class teacher must be a teacher of the same school")),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::TeacherNotFound,
            "Failed to check class teacher",
        )),
    }
}
