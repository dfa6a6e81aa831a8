use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    // 关联的学生账户（可选）
    pub user_id: Option<i64>,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    // YYYY-MM-DD
    pub date_of_birth: Option<String>,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
