use super::entities::Examination;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/examination.ts")]
pub struct ExaminationListResponse {
    pub items: Vec<Examination>,
    pub pagination: PaginationInfo,
}
