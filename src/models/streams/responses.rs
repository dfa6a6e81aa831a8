use super::entities::Stream;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stream.ts")]
pub struct StreamListResponse {
    pub items: Vec<Stream>,
}
