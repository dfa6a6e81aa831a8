//! 任课分配服务
//!
//! 分配关系 (teacher, subject, class) 是教师录入成绩和创建测验的授权依据。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, not_found, storage_error,
    storage_from_request, teachers::teacher_for_user,
};
use crate::models::{
    ApiResponse, ErrorCode,
    teacher_subjects::{
        requests::{BulkAssignRequest, CreateTeacherSubjectRequest, TeacherSubjectQuery},
        responses::{BulkAssignResponse, TeacherSubjectListResponse},
    },
    users::entities::User,
};
use crate::respond_on_err;
use crate::storage::Storage;

pub struct TeacherSubjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherSubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    /// 列出任课分配
    ///
    /// 教师未指定筛选条件时默认返回自己的分配。
    pub async fn list_teacher_subjects(
        &self,
        request: &HttpRequest,
        mut query: TeacherSubjectQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        if !user.is_admin() {
            if query.teacher_id.is_none() && query.class_id.is_none() {
                let teacher = respond_on_err!(teacher_for_user(&storage, user.id).await);
                query.teacher_id = Some(teacher.id);
            }
            if let Some(teacher_id) = query.teacher_id {
                respond_on_err!(check_teacher_school(&storage, &user, teacher_id).await);
            }
            if let Some(class_id) = query.class_id {
                respond_on_err!(check_class_school(&storage, &user, class_id).await);
            }
        }

        match storage.list_teacher_subjects(query).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                TeacherSubjectListResponse { items },
                "Teacher subject assignments retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve assignments: {e}"),
                )),
            ),
        }
    }

    pub async fn create_teacher_subject(
        &self,
        request: &HttpRequest,
        data: CreateTeacherSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        respond_on_err!(
            ensure_same_school(&storage, data.teacher_id, data.class_id, &[data.subject_id]).await
        );

        match storage
            .create_teacher_subject(data.teacher_id, data.subject_id, data.class_id)
            .await
        {
            Ok(assignment) => Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Teacher subject assignment created successfully",
            ))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::AssignmentAlreadyExists,
                "Assignment creation failed",
            )),
        }
    }

    /// 批量分配，已存在的组合跳过
    pub async fn bulk_assign(
        &self,
        request: &HttpRequest,
        data: BulkAssignRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        if data.subject_ids.is_empty() {
            return Ok(bad_request("subject_ids must not be empty"));
        }

        respond_on_err!(
            ensure_same_school(&storage, data.teacher_id, data.class_id, &data.subject_ids).await
        );

        match storage
            .bulk_assign_teacher_subjects(data.teacher_id, data.class_id, &data.subject_ids)
            .await
        {
            Ok((created, skipped)) => {
                tracing::info!(
                    "Bulk assigned {} subjects to teacher {} in class {} ({} skipped)",
                    created.len(),
                    data.teacher_id,
                    data.class_id,
                    skipped.len()
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    BulkAssignResponse { created, skipped },
                    "Bulk assignment completed",
                )))
            }
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::AssignmentAlreadyExists,
                "Bulk assignment failed",
            )),
        }
    }

    pub async fn delete_teacher_subject(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_teacher_subject(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Teacher subject assignment deleted successfully",
            ))),
            Ok(false) => Ok(not_found(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete assignment: {e}"),
                )),
            ),
        }
    }
}

// 教师、班级与科目必须属于同一所学校
async fn ensure_same_school(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    class_id: i64,
    subject_ids: &[i64],
) -> Outcome<()> {
    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Err(storage_error(e, ErrorCode::TeacherNotFound, "Failed to load teacher")),
    };
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Err(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
    };
    if class.school_id != teacher.school_id {
        return Err(bad_request("Teacher and class belong to different schools"));
    }

    let subjects = match storage.list_subjects_by_ids(subject_ids).await {
        Ok(subjects) => subjects,
        Err(e) => return Err(storage_error(e, ErrorCode::SubjectNotFound, "Failed to load subjects")),
    };
    for subject_id in subject_ids {
        match subjects.iter().find(|s| s.id == *subject_id) {
            Some(subject) if subject.school_id == class.school_id => {}
            Some(_) => {
                return Err(bad_request(&format!(
                    "Subject {subject_id} belongs to a different school"
                )));
            }
            None => {
                return Err(not_found(
                    ErrorCode::SubjectNotFound,
                    &format!("Subject {subject_id} not found"),
                ));
            }
        }
    }

    Ok(())
}

async fn check_teacher_school(storage: &Arc<dyn Storage>, user: &User, teacher_id: i64) -> Outcome<()> {
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => ensure_school_access(user, teacher.school_id),
        Ok(None) => Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(storage_error(e, ErrorCode::TeacherNotFound, "Failed to load teacher")),
    }
}

async fn check_class_school(storage: &Arc<dyn Storage>, user: &User, class_id: i64) -> Outcome<()> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => ensure_school_access(user, class.school_id),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Err(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
    }
}

/// 教师在指定科目下被分配的班级集合
pub(crate) async fn assigned_classes(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    subject_id: i64,
) -> Outcome<std::collections::HashSet<i64>> {
    let query = TeacherSubjectQuery {
        teacher_id: Some(teacher_id),
        subject_id: Some(subject_id),
        class_id: None,
    };
    match storage.list_teacher_subjects(query).await {
        Ok(items) => Ok(items.into_iter().map(|a| a.class_id).collect()),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::AssignmentNotFound,
            "Failed to load assignments",
        )),
    }
}
