//! 成绩分析服务

pub mod aggregate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, forbidden, not_found, storage_error,
    storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    analytics::{
        requests::{ExamAnalyticsQuery, ReportCardQuery},
        responses::StudentTrendResponse,
    },
    examinations::entities::Examination,
    results::{entities::ExamResult, requests::ResultQuery},
    students::entities::Student,
    subjects::entities::Subject,
    users::entities::User,
};
use crate::respond_on_err;
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    /// 考试分析：可按班级、分流缩小范围
    ///
    /// 结果包含每名学生的排名，学生账号不可访问。
    pub async fn examination_analytics(
        &self,
        request: &HttpRequest,
        examination_id: i64,
        query: ExamAnalyticsQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        if user.is_student() {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Students cannot view examination analytics",
            ));
        }

        let exam = respond_on_err!(load_examination(&storage, &user, examination_id).await);

        let class_id = query.class_id.or(exam.class_id);
        let students = match class_id {
            Some(class_id) => storage.list_students_by_class(class_id, query.stream_id).await,
            None => storage
                .list_students_by_school(exam.school_id)
                .await
                .map(|students| match query.stream_id {
                    Some(stream_id) => students
                        .into_iter()
                        .filter(|s| s.stream_id == Some(stream_id))
                        .collect(),
                    None => students,
                }),
        };
        let students: Vec<Student> = match students {
            Ok(students) => students
                .into_iter()
                .filter(|s| s.school_id == exam.school_id && exam.covers_class(s.class_id))
                .collect(),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load students",
                ));
            }
        };

        let results = respond_on_err!(
            load_results(
                &storage,
                ResultQuery {
                    examination_id: Some(exam.id),
                    class_id,
                    ..Default::default()
                },
            )
            .await
        );
        let in_scope: HashSet<i64> = students.iter().map(|s| s.id).collect();
        let results: Vec<ExamResult> = results
            .into_iter()
            .filter(|r| in_scope.contains(&r.student_id))
            .collect();
        let subjects = respond_on_err!(load_subjects(&storage, &results).await);

        let analytics = aggregate::exam_analytics(exam, &students, &subjects, &results);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            analytics,
            "Examination analytics retrieved successfully",
        )))
    }

    pub async fn report_card(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: ReportCardQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let student = respond_on_err!(load_student(&storage, &user, student_id).await);
        let exam = respond_on_err!(load_examination(&storage, &user, query.examination_id).await);

        if exam.school_id != student.school_id || !exam.covers_class(student.class_id) {
            return Ok(bad_request("The student did not sit this examination"));
        }

        let class_students = match storage.list_students_by_class(student.class_id, None).await {
            Ok(students) => students,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load class students",
                ));
            }
        };
        let class_results = respond_on_err!(
            load_results(
                &storage,
                ResultQuery {
                    examination_id: Some(exam.id),
                    class_id: Some(student.class_id),
                    ..Default::default()
                },
            )
            .await
        );
        let subjects = respond_on_err!(load_subjects(&storage, &class_results).await);

        let card = aggregate::report_card(student, exam, &class_students, &subjects, &class_results);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Report card retrieved successfully",
        )))
    }

    pub async fn test_analytics(&self, request: &HttpRequest, test_id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let test = match storage.get_test_by_id(test_id).await {
            Ok(Some(test)) => test,
            Ok(None) => return Ok(not_found(ErrorCode::TestNotFound, "Test not found")),
            Err(e) => return Ok(storage_error(e, ErrorCode::TestNotFound, "Failed to load test")),
        };
        respond_on_err!(ensure_school_access(&user, test.school_id));

        let results = match storage.list_test_results(test.id).await {
            Ok(results) => results,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TestResultNotFound,
                    "Failed to load test results",
                ));
            }
        };
        let class_size = match storage.list_students_by_class(test.class_id, None).await {
            Ok(students) => students.len(),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load class students",
                ));
            }
        };

        let analytics = aggregate::test_analytics(test, &results, class_size);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            analytics,
            "Test analytics retrieved successfully",
        )))
    }

    pub async fn student_trend(&self, request: &HttpRequest, student_id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let student = respond_on_err!(load_student(&storage, &user, student_id).await);

        let results = respond_on_err!(
            load_results(
                &storage,
                ResultQuery {
                    student_id: Some(student.id),
                    ..Default::default()
                },
            )
            .await
        );

        let exam_ids: Vec<i64> = distinct(results.iter().map(|r| r.examination_id));
        let exams: Vec<Examination> = match storage.list_examinations_by_ids(&exam_ids).await {
            // 学生只能看到已发布考试的成绩
            Ok(exams) => exams
                .into_iter()
                .filter(|e| e.published || !user.is_student())
                .collect(),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::ExaminationNotFound,
                    "Failed to load examinations",
                ));
            }
        };

        let term_ids: Vec<i64> = distinct(exams.iter().map(|e| e.term_id));
        let terms = match storage.list_terms_by_ids(&term_ids).await {
            Ok(terms) => terms,
            Err(e) => return Ok(storage_error(e, ErrorCode::TermNotFound, "Failed to load terms")),
        };

        let points = aggregate::student_trend(&exams, &terms, &results);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentTrendResponse {
                student_id: student.id,
                points,
            },
            "Student trend retrieved successfully",
        )))
    }
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// 学生只能访问自己的数据
async fn load_student(storage: &Arc<dyn Storage>, user: &User, student_id: i64) -> Outcome<Student> {
    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Err(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => {
            return Err(storage_error(
                e,
                ErrorCode::StudentNotFound,
                "Failed to load student",
            ));
        }
    };

    if user.is_student() && student.user_id != Some(user.id) {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Students can only view their own reports",
        ));
    }
    ensure_school_access(user, student.school_id)?;

    Ok(student)
}

async fn load_examination(
    storage: &Arc<dyn Storage>,
    user: &User,
    examination_id: i64,
) -> Outcome<Examination> {
    match storage.get_examination_by_id(examination_id).await {
        Ok(Some(exam)) if user.is_student() && !exam.published => Err(not_found(
            ErrorCode::ExaminationNotFound,
            "Examination not found",
        )),
        Ok(Some(exam)) => {
            ensure_school_access(user, exam.school_id)?;
            Ok(exam)
        }
        Ok(None) => Err(not_found(
            ErrorCode::ExaminationNotFound,
            "Examination not found",
        )),
        Err(e) => Err(storage_error(
            e,
            ErrorCode::ExaminationNotFound,
            "Failed to load examination",
        )),
    }
}

async fn load_results(storage: &Arc<dyn Storage>, query: ResultQuery) -> Outcome<Vec<ExamResult>> {
    storage
        .list_results(query)
        .await
        .map_err(|e| storage_error(e, ErrorCode::ResultNotFound, "Failed to load results"))
}

async fn load_subjects(storage: &Arc<dyn Storage>, results: &[ExamResult]) -> Outcome<Vec<Subject>> {
    let ids = distinct(results.iter().map(|r| r.subject_id));
    storage
        .list_subjects_by_ids(&ids)
        .await
        .map_err(|e| storage_error(e, ErrorCode::SubjectNotFound, "Failed to load subjects"))
}
