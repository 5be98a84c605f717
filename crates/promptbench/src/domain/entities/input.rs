//! Input and InputSet - Raw texts to evaluate, grouped into named sets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of raw text to process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A named collection of inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSet {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An input set together with its inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSetDetail {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Input>,
}
