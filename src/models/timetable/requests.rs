use crate::models::common::{deserialize_clearable_i64, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub stream_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub day_of_week: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct CreateTimetableEntryRequest {
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct UpdateTimetableEntryRequest {
    /// 显式 null 表示改为全班课程
    #[serde(default, deserialize_with = "deserialize_clearable_i64")]
    pub stream_id: Option<Option<i64>>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TeacherSuggestionQuery {
    pub class_id: i64,
    pub subject_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
}
