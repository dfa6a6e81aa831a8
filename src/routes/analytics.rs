use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::analytics::requests::{ExamAnalyticsQuery, ReportCardQuery};
use crate::models::users::entities::UserRole;
use crate::services::{AnalyticsService, DashboardService};
use crate::utils::SafeIDI64;

static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn examination_analytics(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ExamAnalyticsQuery>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .examination_analytics(&req, id.0, query.into_inner())
        .await
}

pub async fn report_card(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ReportCardQuery>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .report_card(&req, id.0, query.into_inner())
        .await
}

pub async fn test_analytics(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.test_analytics(&req, id.0).await
}

pub async fn student_trend(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.student_trend(&req, id.0).await
}

pub async fn get_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_dashboard(&req).await
}

// 考试分析含全班排名，仅限教师与管理员；其余接口由服务层按角色收窄
pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analytics")
            .wrap(middlewares::RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .route(
                "/examinations/{id}",
                web::get()
                    .to(examination_analytics)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/students/{id}/report", web::get().to(report_card))
            .route("/students/{id}/trend", web::get().to(student_trend))
            .route("/tests/{id}", web::get().to(test_analytics)),
    )
    .service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_dashboard)),
    );
}
