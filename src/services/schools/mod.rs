pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{Outcome, storage_from_request};
use crate::models::schools::requests::{
    CreateSchoolRequest, SchoolQueryParams, UpdateSchoolRequest,
};
use crate::storage::Storage;

pub struct SchoolService {
    storage: Option<Arc<dyn Storage>>,
}

impl SchoolService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_schools(
        &self,
        query: SchoolQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, query, request).await
    }

    pub async fn create_school(
        &self,
        school_data: CreateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, school_data, request).await
    }

    pub async fn get_school(
        &self,
        school_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_school(self, school_id, request).await
    }

    pub async fn update_school(
        &self,
        school_id: i64,
        update_data: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, school_id, update_data, request).await
    }

    pub async fn delete_school(
        &self,
        school_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_school(self, school_id, request).await
    }
}
