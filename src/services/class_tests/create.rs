use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::ClassTestService;
use crate::models::{ApiResponse, ErrorCode, class_tests::requests::CreateTestRequest};
use crate::respond_on_err;
use crate::services::{
    bad_request, current_user, ensure_school_access, error_response, not_found, storage_error,
    teachers::teacher_for_user,
};
use crate::utils::validate::{validate_date, validate_max_score};

pub async fn create_test(
    service: &ClassTestService,
    request: &HttpRequest,
    mut test_data: CreateTestRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    test_data.title = test_data.title.trim().to_string();
    if test_data.title.is_empty() {
        return Ok(bad_request("Test title must not be empty"));
    }
    if let Err(msg) = validate_max_score(test_data.max_score) {
        return Ok(bad_request(msg));
    }
    if let Some(ref date) = test_data.test_date
        && let Err(msg) = validate_date(date)
    {
        return Ok(bad_request(&msg));
    }

    // 教师为自己创建；管理员需指定教师
    let teacher = if user.is_admin() {
        let Some(teacher_id) = test_data.teacher_id else {
            return Ok(bad_request("teacher_id is required"));
        };
        match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(teacher)) => teacher,
            Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TeacherNotFound,
                    "Failed to load teacher",
                ));
            }
        }
    } else {
        respond_on_err!(teacher_for_user(&storage, user.id).await)
    };

    let class = match storage.get_class_by_id(test_data.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
    };
    respond_on_err!(ensure_school_access(&user, class.school_id));
    if class.school_id != teacher.school_id {
        return Ok(bad_request("Teacher and class belong to different schools"));
    }

    match storage.get_subject_by_id(test_data.subject_id).await {
        Ok(Some(subject)) if subject.school_id == class.school_id => {}
        Ok(Some(_)) => return Ok(bad_request("Subject belongs to a different school")),
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::SubjectNotFound,
                "Failed to load subject",
            ));
        }
    }

    if let Some(term_id) = test_data.term_id {
        match storage.get_term_by_id(term_id).await {
            Ok(Some(term)) if term.school_id == class.school_id => {}
            Ok(Some(_)) => return Ok(bad_request("Term belongs to a different school")),
            Ok(None) => return Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => return Ok(storage_error(e, ErrorCode::TermNotFound, "Failed to load term")),
        }
    }

    // 教师只能为自己任教的科目和班级出题
    if !user.is_admin() {
        match storage
            .find_teacher_subject(teacher.id, test_data.subject_id, class.id)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::TestPermissionDenied,
                    "Not assigned to teach this subject in this class",
                ));
            }
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::AssignmentNotFound,
                    "Failed to load assignment",
                ));
            }
        }
    }

    match storage
        .create_test(class.school_id, teacher.id, test_data)
        .await
    {
        Ok(test) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(test, "Test created successfully"))),
        Err(e) => Ok(storage_error(e, ErrorCode::Conflict, "Test creation failed")),
    }
}
