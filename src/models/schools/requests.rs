use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学校查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建学校请求，code 为空时自动生成
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct CreateSchoolRequest {
    pub name: String,
    pub code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// 更新学校请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// 学校列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SchoolListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    // 非管理员仅能看到自己的学校
    pub only_id: Option<i64>,
    pub search: Option<String>,
}
