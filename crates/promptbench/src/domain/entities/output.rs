//! Output and Evaluation - Invocation results and human quality judgments
//!
//! An Output is immutable: re-running the same (input, model, prompt) triple
//! creates a new Output rather than replacing the old one, which is why the
//! history view exists. Evaluations are the exception - posting a second
//! evaluation for the same output upserts in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Quality;

/// One (input, model, prompt version) invocation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub id: i64,
    pub input_id: i64,
    pub model_id: i64,
    pub prompt_id: i64,
    #[serde(default)]
    pub prompt_version_number: Option<i32>,
    pub text: String,
    pub processing_time: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored human quality judgment for one output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub id: Option<i64>,
    pub output_id: i64,
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
