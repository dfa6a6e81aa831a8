use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试成绩：每个学生每门科目每场考试唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResult {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub examination_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
    // 录入人（users.id）
    pub entered_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 存储层写入用的成绩行
#[derive(Debug, Clone)]
pub struct ResultUpsert {
    pub student_id: i64,
    pub subject_id: i64,
    pub examination_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
    pub entered_by: Option<i64>,
}

// 批量写入中单行的错误
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct RowError {
    // 从 1 开始的行号
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}
