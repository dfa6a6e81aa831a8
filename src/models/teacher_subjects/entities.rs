use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师任课分配：教师在某个班级教授某门科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct TeacherSubject {
    pub id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
