use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级下的分流（stream），如 "East" / "West"
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stream.ts")]
pub struct Stream {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
