//! 仪表盘统计，按角色返回不同的计数

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use super::{Outcome, current_user, storage_from_request, teachers::teacher_for_user};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    dashboard::responses::{AdminDashboard, DashboardResponse, StudentDashboard, TeacherDashboard},
    examinations::entities::Examination,
    results::requests::ResultQuery,
    teacher_subjects::requests::TeacherSubjectQuery,
    users::entities::{User, UserRole},
};
use crate::respond_on_err;
use crate::services::analytics::aggregate;
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        let mut response = DashboardResponse {
            role: user.role.clone(),
            admin: None,
            teacher: None,
            student: None,
        };

        let outcome = match user.role {
            UserRole::Admin => admin_counters(&storage).await.map(|d| response.admin = Some(d)),
            UserRole::Teacher => {
                let teacher = respond_on_err!(teacher_for_user(&storage, user.id).await);
                teacher_counters(&storage, &user, teacher.id)
                    .await
                    .map(|d| response.teacher = Some(d))
            }
            UserRole::Student => student_counters(&storage, &user)
                .await
                .map(|d| response.student = Some(d)),
        };

        match outcome {
            Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Dashboard retrieved successfully",
            ))),
            Err(e) => {
                tracing::error!("Failed to build dashboard for user {}: {}", user.id, e);
                Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to build dashboard: {e}"),
                    )),
                )
            }
        }
    }
}

async fn admin_counters(storage: &Arc<dyn Storage>) -> Result<AdminDashboard> {
    Ok(AdminDashboard {
        schools: storage.count_schools().await?,
        classes: storage.count_classes(None).await?,
        students: storage.count_students(None).await?,
        teachers: storage.count_teachers(None).await?,
        subjects: storage.count_subjects(None).await?,
        examinations: storage.count_examinations(None).await?,
    })
}

async fn teacher_counters(
    storage: &Arc<dyn Storage>,
    user: &User,
    teacher_id: i64,
) -> Result<TeacherDashboard> {
    let assignments = storage
        .list_teacher_subjects(TeacherSubjectQuery {
            teacher_id: Some(teacher_id),
            ..Default::default()
        })
        .await?;
    let classes: HashSet<i64> = assignments.iter().map(|a| a.class_id).collect();

    Ok(TeacherDashboard {
        assignments: assignments.len() as u64,
        classes: classes.len() as u64,
        tests_created: storage.count_tests(Some(teacher_id)).await?,
        results_entered: storage.count_results_entered_by(user.id).await?,
    })
}

// 最近一次已发布考试的平均分与等级，取成绩走势的最后一个点
async fn student_counters(storage: &Arc<dyn Storage>, user: &User) -> Result<StudentDashboard> {
    let Some(student) = storage.get_student_by_user_id(user.id).await? else {
        return Ok(StudentDashboard::default());
    };

    let mut dashboard = StudentDashboard {
        test_count: storage.count_test_results_for_student(student.id).await?,
        ..Default::default()
    };

    let results = storage
        .list_results(ResultQuery {
            student_id: Some(student.id),
            ..Default::default()
        })
        .await?;
    let mut exam_ids: Vec<i64> = results.iter().map(|r| r.examination_id).collect();
    exam_ids.sort_unstable();
    exam_ids.dedup();

    let exams: Vec<Examination> = storage
        .list_examinations_by_ids(&exam_ids)
        .await?
        .into_iter()
        .filter(|e| e.published)
        .collect();
    let mut term_ids: Vec<i64> = exams.iter().map(|e| e.term_id).collect();
    term_ids.sort_unstable();
    term_ids.dedup();
    let terms = storage.list_terms_by_ids(&term_ids).await?;

    if let Some(latest) = aggregate::student_trend(&exams, &terms, &results).pop() {
        dashboard.latest_examination_id = Some(latest.examination_id);
        dashboard.latest_examination_name = Some(latest.examination_name);
        dashboard.latest_average = Some(latest.average_percentage);
        dashboard.latest_grade = Some(latest.mean_grade);
    }

    Ok(dashboard)
}
