use super::entities::Student;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}
