use super::entities::Term;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct TermListResponse {
    pub items: Vec<Term>,
}
