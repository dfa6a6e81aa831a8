use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stream.ts")]
pub struct CreateStreamRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stream.ts")]
pub struct UpdateStreamRequest {
    pub name: String,
}
