use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AdminDashboard {
    pub schools: u64,
    pub classes: u64,
    pub students: u64,
    pub teachers: u64,
    pub subjects: u64,
    pub examinations: u64,
}

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub assignments: u64,
    pub classes: u64,
    pub tests_created: u64,
    pub results_entered: u64,
}

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub latest_examination_id: Option<i64>,
    pub latest_examination_name: Option<String>,
    pub latest_average: Option<f64>,
    pub latest_grade: Option<String>,
    pub test_count: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardResponse {
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminDashboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherDashboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentDashboard>,
}
