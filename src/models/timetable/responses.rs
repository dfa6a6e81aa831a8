use super::entities::TimetableEntry;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableListResponse {
    pub items: Vec<TimetableEntry>,
}

// 409 响应的附带数据
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableConflictResponse {
    pub conflicting_entry_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TeacherSuggestion {
    pub teacher_id: i64,
    pub user_id: i64,
    pub display_name: Option<String>,
    pub weekly_lessons: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TeacherSuggestionResponse {
    pub items: Vec<TeacherSuggestion>,
}
