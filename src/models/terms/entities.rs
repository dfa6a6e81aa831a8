use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct Term {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub year: i32,
    // YYYY-MM-DD
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
