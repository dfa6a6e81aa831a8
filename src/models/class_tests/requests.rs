use super::entities::TestType;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct TestQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub term_id: Option<i64>,
}

// 创建测验请求
//
// # teacher_id 字段说明
// - **教师创建**：忽略该字段，使用当前登录教师的档案
// - **管理员创建**：必填
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct CreateTestRequest {
    pub teacher_id: Option<i64>,
    pub class_id: i64,
    pub subject_id: i64,
    pub term_id: Option<i64>,
    pub title: String,
    pub test_type: TestType,
    pub max_score: f64,
    pub test_date: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct UpdateTestRequest {
    pub term_id: Option<i64>,
    pub title: Option<String>,
    pub test_type: Option<TestType>,
    pub max_score: Option<f64>,
    pub test_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct TestResultEntry {
    pub student_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct UpsertTestResultsRequest {
    pub results: Vec<TestResultEntry>,
}

// 测验列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct TestListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub term_id: Option<i64>,
}
