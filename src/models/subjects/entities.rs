use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
