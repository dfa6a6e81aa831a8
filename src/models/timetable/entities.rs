use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程表条目，时间以 "HH:MM" 对外暴露，内部按分钟存储
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    // None 表示整个班级
    pub stream_id: Option<i64>,
    pub subject_id: i64,
    pub teacher_id: i64,
    // 1 = 周一 .. 7 = 周日
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    #[serde(skip)]
    #[ts(skip)]
    pub start_minute: i32,
    #[serde(skip)]
    #[ts(skip)]
    pub end_minute: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 存储层写入用的课程表条目
#[derive(Debug, Clone)]
pub struct TimetableSlot {
    pub school_id: i64,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub day_of_week: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub room: Option<String>,
}
