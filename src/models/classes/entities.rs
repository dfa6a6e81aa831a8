use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 所属学校
    pub school_id: i64,
    // 班级名称
    pub name: String,
    // 年级（form / grade）
    pub level: i32,
    // 班主任（teachers.id）
    pub class_teacher_id: Option<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
