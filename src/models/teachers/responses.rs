use super::entities::TeacherWithUser;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListResponse {
    pub items: Vec<TeacherWithUser>,
    pub pagination: PaginationInfo,
}
