use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师档案，user_id 指向角色为 teacher 的账户
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub school_id: i64,
    pub user_id: i64,
    pub staff_number: Option<String>,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 附带账户信息的教师
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherWithUser {
    #[serde(flatten)]
    #[ts(flatten)]
    pub teacher: Teacher,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}
