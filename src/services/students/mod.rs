pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{Outcome, bad_request, not_found, storage_error, storage_from_request};
use crate::models::ErrorCode;
use crate::models::classes::entities::Class;
use crate::models::students::requests::{
    CreateStudentRequest, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;
use crate::utils::validate::validate_date;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student_data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student_data).await
    }

    pub async fn get_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_student(self, request, id).await
    }

    // 当前学生账户对应的学生档案
    pub async fn get_my_student(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_my_student(self, request).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, id, update_data).await
    }

    pub async fn delete_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, id).await
    }
}

/// 校验班级与分流的归属关系，返回班级
pub(crate) async fn resolve_placement(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    stream_id: Option<i64>,
) -> Outcome<Class> {
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => {
            return Err(storage_error(
                e,
                ErrorCode::ClassNotFound,
                "Failed to load class",
            ));
        }
    };

    if let Some(stream_id) = stream_id {
        match storage.get_stream_by_id(stream_id).await {
            Ok(Some(stream)) if stream.class_id == class.id => {}
            Ok(_) => {
                return Err(super::error_response(
                    actix_web::http::StatusCode::BAD_REQUEST,
                    ErrorCode::StreamClassMismatch,
                    "Stream does not belong to the student's class",
                ));
            }
            Err(e) => {
                return Err(storage_error(
                    e,
                    ErrorCode::StreamNotFound,
                    "Failed to load stream",
                ));
            }
        }
    }

    Ok(class)
}

/// 关联账户必须是学生角色
pub(crate) async fn ensure_student_account(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Outcome<()> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => Ok(()),
        Ok(Some(_)) => Err(bad_request("Linked account must have the student role")),
        Ok(None) => Err(bad_request("Linked account does not exist")),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::UserNotFound,
            "Failed to load linked account",
        )),
    }
}

pub(crate) fn validate_birth_date(date_of_birth: Option<&str>) -> Outcome<()> {
    if let Some(date) = date_of_birth
        && let Err(msg) = validate_date(date)
    {
        return Err(bad_request(&msg));
    }
    Ok(())
}
