//! 教师档案服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, not_found, resolve_school_scope,
    storage_error, storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    teachers::{
        entities::{Teacher, TeacherWithUser},
        requests::{
            CreateTeacherRequest, TeacherListQuery, TeacherQueryParams, UpdateTeacherRequest,
        },
    },
    users::entities::UserRole,
};
use crate::respond_on_err;
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherQueryParams,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        let school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

        let list_query = TeacherListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            school_id,
            search: query.search,
        };

        match storage.list_teachers_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Teacher list retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve teacher list: {e}"),
                )),
            ),
        }
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        teacher_data: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        // 关联账户必须是教师角色，且不能属于其他学校
        match storage.get_user_by_id(teacher_data.user_id).await {
            Ok(Some(account)) => {
                if account.role != UserRole::Teacher {
                    return Ok(bad_request("Linked account must have the teacher role"));
                }
                if account
                    .school_id
                    .is_some_and(|id| id != teacher_data.school_id)
                {
                    return Ok(bad_request("Linked account belongs to another school"));
                }
            }
            Ok(None) => return Ok(bad_request("Linked account does not exist")),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TeacherAlreadyExists,
                    "Teacher creation failed",
                ));
            }
        }

        match storage.create_teacher(teacher_data).await {
            Ok(teacher) => Ok(HttpResponse::Created()
                .json(ApiResponse::success(teacher, "Teacher created successfully"))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TeacherAlreadyExists,
                "Teacher creation failed",
            )),
        }
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let teacher = respond_on_err!(load_with_user(&storage, id).await);
        respond_on_err!(ensure_school_access(&user, teacher.teacher.school_id));

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher retrieved successfully",
        )))
    }

    // 当前教师账户对应的教师档案
    pub async fn get_my_teacher(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let teacher = respond_on_err!(teacher_for_user(&storage, user.id).await);
        let teacher = respond_on_err!(load_with_user(&storage, teacher.id).await);

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher retrieved successfully",
        )))
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.update_teacher(id, update_data).await {
            Ok(Some(teacher)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(teacher, "Teacher updated successfully"))),
            Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TeacherAlreadyExists,
                "Failed to update teacher",
            )),
        }
    }

    pub async fn delete_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_teacher(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Teacher deleted successfully"))),
            Ok(false) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete teacher: {e}"),
                )),
            ),
        }
    }
}

async fn load_with_user(storage: &Arc<dyn Storage>, id: i64) -> Outcome<TeacherWithUser> {
    match storage.list_teachers_with_user_by_ids(&[id]).await {
        Ok(found) => found
            .into_iter()
            .next()
            .ok_or_else(|| not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::TeacherNotFound,
            "Failed to get teacher",
        )),
    }
}

/// 根据账户查找教师档案，没有档案时返回 403
pub(crate) async fn teacher_for_user(storage: &Arc<dyn Storage>, user_id: i64) -> Outcome<Teacher> {
    match storage.get_teacher_by_user_id(user_id).await {
        Ok(Some(teacher)) => Ok(teacher),
        Ok(None) => Err(super::forbidden(
            ErrorCode::TeacherNotFound,
            "No teacher record is linked to this account",
        )),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::TeacherNotFound,
            "Failed to load teacher record",
        )),
    }
}
