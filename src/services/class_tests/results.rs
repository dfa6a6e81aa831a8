//! 测验成绩

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};

use super::{ClassTestService, load_test_for_read, load_test_for_write};
use crate::models::{
    ApiResponse, ErrorCode,
    class_tests::{
        entities::{Test, TestResultUpsert},
        requests::UpsertTestResultsRequest,
        responses::TestResultListResponse,
    },
    results::{entities::RowError, responses::BulkUpsertResponse},
    students::entities::Student,
};
use crate::respond_on_err;
use crate::services::results::check_batch_size;
use crate::services::{current_user, not_found, storage_error};
use crate::utils::validate::validate_score;

/// 学生必须属于测验所在班级，分数在 0..=max_score 之间
fn check_row(test: &Test, student: &Student, score: f64) -> Result<(), (&'static str, String)> {
    if student.class_id != test.class_id {
        return Err((
            "student_id",
            "Student is not in the test's class".to_string(),
        ));
    }
    validate_score(score, test.max_score).map_err(|msg| ("score", msg))
}

pub async fn list_results(
    service: &ClassTestService,
    request: &HttpRequest,
    test_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let test = respond_on_err!(load_test_for_read(&storage, &user, test_id).await);

    let mut items = match storage.list_test_results(test.id).await {
        Ok(items) => items,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve test results: {e}"),
                )),
            );
        }
    };

    // 学生只看到自己的成绩
    if user.is_student() {
        let own = match storage.get_student_by_user_id(user.id).await {
            Ok(student) => student.map(|s| s.id),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load student record",
                ));
            }
        };
        items.retain(|r| Some(r.student_id) == own);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TestResultListResponse { items },
        "Test results retrieved successfully",
    )))
}

pub async fn upsert_results(
    service: &ClassTestService,
    request: &HttpRequest,
    test_id: i64,
    data: UpsertTestResultsRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let test = respond_on_err!(load_test_for_write(&storage, &user, test_id).await);

    respond_on_err!(check_batch_size(data.results.len(), "results"));

    let ids: Vec<i64> = data.results.iter().map(|r| r.student_id).collect();
    let students: HashMap<i64, Student> = match storage.list_students_by_ids(&ids).await {
        Ok(students) => students.into_iter().map(|s| (s.id, s)).collect(),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::StudentNotFound,
                "Failed to load students",
            ));
        }
    };

    let total = data.results.len();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (idx, entry) in data.results.into_iter().enumerate() {
        let row_num = idx + 1;
        let Some(student) = students.get(&entry.student_id) else {
            errors.push(RowError::new(row_num, "student_id", "Student not found"));
            continue;
        };
        if !seen.insert(student.id) {
            errors.push(RowError::new(row_num, "student_id", "Duplicate student"));
            continue;
        }
        if let Err((field, message)) = check_row(&test, student, entry.score) {
            errors.push(RowError::new(row_num, field, message));
            continue;
        }
        rows.push(TestResultUpsert {
            test_id: test.id,
            student_id: student.id,
            score: entry.score,
            remarks: entry
                .remarks
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        });
    }

    let success = match storage.upsert_test_results(rows).await {
        Ok(written) => written,
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::Conflict,
                "Failed to save test results",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BulkUpsertResponse {
            total,
            success,
            failed: total - success,
            errors,
        },
        "Test results saved",
    )))
}

pub async fn delete_result(
    service: &ClassTestService,
    request: &HttpRequest,
    test_id: i64,
    result_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let test = respond_on_err!(load_test_for_write(&storage, &user, test_id).await);

    match storage.get_test_result_by_id(result_id).await {
        Ok(Some(result)) if result.test_id == test.id => {}
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::TestResultNotFound,
                "Test result not found",
            ));
        }
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::TestResultNotFound,
                "Failed to load test result",
            ));
        }
    }

    match storage.delete_test_result(result_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_empty("Test result deleted successfully"))),
        Ok(false) => Ok(not_found(
            ErrorCode::TestResultNotFound,
            "Test result not found",
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete test result: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_tests::entities::TestType;

    fn test_in_class(class_id: i64) -> Test {
        Test {
            id: 1,
            school_id: 1,
            teacher_id: 1,
            class_id,
            subject_id: 1,
            term_id: None,
            title: "Fractions quiz".to_string(),
            test_type: TestType::Quiz,
            max_score: 20.0,
            test_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn student_in_class(class_id: i64) -> Student {
        Student {
            id: 5,
            school_id: 1,
            user_id: None,
            admission_number: "A5".to_string(),
            first_name: "Brian".to_string(),
            last_name: "Mwangi".to_string(),
            gender: None,
            date_of_birth: None,
            class_id,
            stream_id: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_row_checks() {
        let test = test_in_class(2);
        assert!(check_row(&test, &student_in_class(2), 20.0).is_ok());
        assert_eq!(
            check_row(&test, &student_in_class(3), 10.0).map_err(|e| e.0),
            Err("student_id")
        );
        assert_eq!(
            check_row(&test, &student_in_class(2), 20.5).map_err(|e| e.0),
            Err("score")
        );
    }
}
