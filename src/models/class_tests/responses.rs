use super::entities::{Test, TestResult};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct TestListResponse {
    pub items: Vec<Test>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct TestResultListResponse {
    pub items: Vec<TestResult>,
}
