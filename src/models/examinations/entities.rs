use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/examination.ts")]
pub struct Examination {
    pub id: i64,
    pub school_id: i64,
    pub term_id: i64,
    pub name: String,
    pub year: i32,
    // None 表示全校考试
    pub class_id: Option<i64>,
    pub max_score: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Examination {
    /// 考试是否适用于指定班级
    pub fn covers_class(&self, class_id: i64) -> bool {
        self.class_id.is_none_or(|id| id == class_id)
    }
}
