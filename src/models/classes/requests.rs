use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

// 创建班级请求
//
// # school_id 字段说明
// - 管理员必须指定所属学校
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub school_id: i64,
    pub name: String,
    pub level: i32,
    pub class_teacher_id: Option<i64>,
}

// 更新班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub level: Option<i32>,
    pub class_teacher_id: Option<i64>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub search: Option<String>,
}
