//! LlmModel - An identified LLM backend target

use serde::{Deserialize, Serialize};

/// A model the backend can invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmModel {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
