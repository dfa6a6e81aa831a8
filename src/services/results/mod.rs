pub mod bulk;
pub mod delete;
pub mod import;
pub mod list;
pub mod upsert;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::collections::HashSet;
use std::sync::Arc;

use super::{
    Outcome, bad_request, ensure_school_access, error_response, not_found, storage_error,
    storage_from_request, teacher_subjects::assigned_classes, teachers::teacher_for_user,
};
use crate::models::{
    ApiResponse, ErrorCode,
    examinations::entities::Examination,
    results::{
        entities::{ResultUpsert, RowError},
        requests::{BulkResultsRequest, ImportResultsQuery, ResultQuery, UpsertResultRequest},
        responses::BulkUpsertResponse,
    },
    students::entities::Student,
    subjects::entities::Subject,
    users::entities::User,
};
use crate::storage::Storage;
use crate::utils::validate::validate_score;

/// 单次批量写入的最大行数
pub(crate) const MAX_BULK_ROWS: usize = 1000;

/// 批量写入的行数必须在 1..=MAX_BULK_ROWS 之间
pub(crate) fn check_batch_size(len: usize, field: &str) -> Outcome<()> {
    if len == 0 {
        return Err(bad_request(&format!("{field} must not be empty")));
    }
    if len > MAX_BULK_ROWS {
        return Err(bad_request(&format!(
            "At most {MAX_BULK_ROWS} rows can be uploaded at once"
        )));
    }
    Ok(())
}

pub struct ResultService {
    storage: Option<Arc<dyn Storage>>,
}

impl ResultService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_results(
        &self,
        request: &HttpRequest,
        query: ResultQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_results(self, request, query).await
    }

    pub async fn upsert_result(
        &self,
        request: &HttpRequest,
        data: UpsertResultRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_result(self, request, data).await
    }

    pub async fn bulk_upsert(
        &self,
        request: &HttpRequest,
        data: BulkResultsRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::bulk_upsert(self, request, data).await
    }

    pub async fn import_results(
        &self,
        request: &HttpRequest,
        query: ImportResultsQuery,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        import::import_results(self, request, query, payload).await
    }

    pub async fn delete_result(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_result(self, request, id).await
    }
}

/// 一场考试一门科目的写入上下文
pub(crate) struct WriteContext {
    pub exam: Examination,
    pub subject: Subject,
    /// 教师可写入的班级；None 表示不受限（管理员）
    pub allowed_classes: Option<HashSet<i64>>,
}

/// 单行被拒绝的原因
#[derive(Debug, PartialEq)]
pub(crate) enum RowRejection {
    Invalid { field: &'static str, message: String },
    NotPermitted(String),
}

impl RowRejection {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn into_row_error(self, row: usize) -> RowError {
        match self {
            Self::Invalid { field, message } => RowError::new(row, field, message),
            Self::NotPermitted(message) => RowError::new(row, "student_id", message),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        match self {
            Self::Invalid { field, message } => {
                let code = if field == "score" {
                    ErrorCode::ResultScoreInvalid
                } else {
                    ErrorCode::BadRequest
                };
                error_response(StatusCode::BAD_REQUEST, code, &message)
            }
            Self::NotPermitted(message) => error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::ResultPermissionDenied,
                &message,
            ),
        }
    }
}

impl WriteContext {
    /// 校验单个学生的一行成绩
    pub fn check_row(&self, student: &Student, score: f64) -> Result<(), RowRejection> {
        if student.school_id != self.exam.school_id {
            return Err(RowRejection::invalid(
                "student_id",
                "Student does not belong to the examination's school",
            ));
        }
        if !self.exam.covers_class(student.class_id) {
            return Err(RowRejection::invalid(
                "student_id",
                "Student's class does not sit this examination",
            ));
        }
        if let Some(ref classes) = self.allowed_classes
            && !classes.contains(&student.class_id)
        {
            return Err(RowRejection::NotPermitted(format!(
                "Not assigned to teach {} in this student's class",
                self.subject.name
            )));
        }
        validate_score(score, self.exam.max_score).map_err(|msg| RowRejection::invalid("score", msg))
    }

    pub fn upsert_row(&self, student_id: i64, score: f64, remarks: Option<String>, user_id: i64) -> ResultUpsert {
        ResultUpsert {
            student_id,
            subject_id: self.subject.id,
            examination_id: self.exam.id,
            score,
            remarks: remarks
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            entered_by: Some(user_id),
        }
    }
}

/// 加载考试与科目，并确定当前用户可写入的班级
pub(crate) async fn load_write_context(
    storage: &Arc<dyn Storage>,
    user: &User,
    examination_id: i64,
    subject_id: i64,
) -> Outcome<WriteContext> {
    let exam = match storage.get_examination_by_id(examination_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Err(not_found(
                ErrorCode::ExaminationNotFound,
                "Examination not found",
            ));
        }
        Err(e) => {
            return Err(storage_error(
                e,
                ErrorCode::ExaminationNotFound,
                "Failed to load examination",
            ));
        }
    };
    ensure_school_access(user, exam.school_id)?;

    let subject = match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Err(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => {
            return Err(storage_error(
                e,
                ErrorCode::SubjectNotFound,
                "Failed to load subject",
            ));
        }
    };
    if subject.school_id != exam.school_id {
        return Err(bad_request("Subject belongs to a different school"));
    }

    let allowed_classes = if user.is_admin() {
        None
    } else {
        let teacher = teacher_for_user(storage, user.id).await?;
        let classes = assigned_classes(storage, teacher.id, subject.id).await?;
        if classes.is_empty() {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::ResultPermissionDenied,
                "Not assigned to teach this subject",
            ));
        }
        Some(classes)
    };

    Ok(WriteContext {
        exam,
        subject,
        allowed_classes,
    })
}

/// 写入已通过校验的行并汇总结果
pub(crate) async fn commit_rows(
    storage: &Arc<dyn Storage>,
    total: usize,
    rows: Vec<ResultUpsert>,
    mut errors: Vec<RowError>,
) -> ActixResult<HttpResponse> {
    let success = match storage.upsert_results(rows).await {
        Ok(written) => written,
        Err(e) => return Ok(storage_error(e, ErrorCode::Conflict, "Failed to save results")),
    };

    errors.sort_by_key(|e| e.row);
    let response = BulkUpsertResponse {
        total,
        success,
        failed: total - success,
        errors,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Results saved")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(class_id: Option<i64>) -> Examination {
        Examination {
            id: 1,
            school_id: 10,
            term_id: 1,
            name: "Mid Term".to_string(),
            year: 2024,
            class_id,
            max_score: 50.0,
            start_date: None,
            end_date: None,
            published: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn subject() -> Subject {
        Subject {
            id: 3,
            school_id: 10,
            name: "Mathematics".to_string(),
            code: "MAT".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn student(school_id: i64, class_id: i64) -> Student {
        Student {
            id: 7,
            school_id,
            user_id: None,
            admission_number: "ADM-7".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            gender: None,
            date_of_birth: None,
            class_id,
            stream_id: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn ctx(class_id: Option<i64>, allowed: Option<&[i64]>) -> WriteContext {
        WriteContext {
            exam: exam(class_id),
            subject: subject(),
            allowed_classes: allowed.map(|c| c.iter().copied().collect()),
        }
    }

    #[test]
    fn test_batch_size_limits() {
        assert!(check_batch_size(0, "entries").is_err());
        assert!(check_batch_size(1, "entries").is_ok());
        assert!(check_batch_size(MAX_BULK_ROWS, "entries").is_ok());
        let response = check_batch_size(MAX_BULK_ROWS + 1, "results").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_score_must_be_within_max_score() {
        let ctx = ctx(None, None);
        assert!(ctx.check_row(&student(10, 2), 0.0).is_ok());
        assert!(ctx.check_row(&student(10, 2), 50.0).is_ok());
        assert!(matches!(
            ctx.check_row(&student(10, 2), 50.5),
            Err(RowRejection::Invalid { field: "score", .. })
        ));
        assert!(matches!(
            ctx.check_row(&student(10, 2), -1.0),
            Err(RowRejection::Invalid { field: "score", .. })
        ));
    }

    #[test]
    fn test_student_must_sit_examination() {
        assert!(ctx(None, None).check_row(&student(11, 2), 10.0).is_err());
        assert!(ctx(Some(2), None).check_row(&student(10, 2), 10.0).is_ok());
        assert!(matches!(
            ctx(Some(3), None).check_row(&student(10, 2), 10.0),
            Err(RowRejection::Invalid { field: "student_id", .. })
        ));
    }

    #[test]
    fn test_teacher_limited_to_assigned_classes() {
        let ctx = ctx(None, Some(&[2, 4]));
        assert!(ctx.check_row(&student(10, 4), 10.0).is_ok());
        assert!(matches!(
            ctx.check_row(&student(10, 5), 10.0),
            Err(RowRejection::NotPermitted(_))
        ));
    }

    #[test]
    fn test_upsert_row_trims_remarks() {
        let ctx = ctx(None, None);
        let row = ctx.upsert_row(7, 42.0, Some("  ".to_string()), 99);
        assert_eq!(row.remarks, None);
        assert_eq!(row.entered_by, Some(99));
        assert_eq!(row.subject_id, 3);
        assert_eq!(row.examination_id, 1);

        let row = ctx.upsert_row(7, 42.0, Some(" Good work ".to_string()), 99);
        assert_eq!(row.remarks.as_deref(), Some("Good work"));
    }
}
