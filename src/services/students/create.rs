use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::{StudentService, ensure_student_account, resolve_placement, validate_birth_date};
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::respond_on_err;
use crate::services::{bad_request, error_response, storage_error};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    mut student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));

    student_data.admission_number = student_data.admission_number.trim().to_string();
    student_data.first_name = student_data.first_name.trim().to_string();
    student_data.last_name = student_data.last_name.trim().to_string();
    if student_data.admission_number.is_empty() {
        return Ok(bad_request("Admission number must not be empty"));
    }
    if student_data.first_name.is_empty() || student_data.last_name.is_empty() {
        return Ok(bad_request("Student name must not be empty"));
    }
    respond_on_err!(validate_birth_date(student_data.date_of_birth.as_deref()));

    // 学校取自班级
    let class = respond_on_err!(
        resolve_placement(&storage, student_data.class_id, student_data.stream_id).await
    );

    match storage
        .get_student_by_admission_number(class.school_id, &student_data.admission_number)
        .await
    {
        Ok(Some(_)) => {
            return Ok(error_response(
                StatusCode::CONFLICT,
                ErrorCode::StudentAlreadyExists,
                "Admission number already exists in this school",
            ));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::StudentAlreadyExists,
                "Student lookup failed",
            ));
        }
    }

    if let Some(user_id) = student_data.user_id {
        respond_on_err!(ensure_student_account(&storage, user_id).await);
    }

    match storage.create_student(class.school_id, student_data).await {
        Ok(student) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(student, "Student created successfully"))),
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::StudentAlreadyExists,
            "Student creation failed",
        )),
    }
}
