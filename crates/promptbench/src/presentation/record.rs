//! Loose wire records for processing results
//!
//! The four processing endpoints (single process, batch process, compare,
//! history) wrap the same logical Output in structurally different
//! envelopes: some nest the model/prompt/input objects, some flatten them
//! to `*_id`/`*_name` fields, and older rows can be missing fields
//! entirely. These records deserialize the union of all observed shapes;
//! normalization into one canonical view happens in [`super::view`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::entities::Input;
use crate::domain::value_objects::Quality;

/// Partial reference to an input, as embedded in result envelopes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<&Input> for InputRef {
    fn from(input: &Input) -> Self {
        Self {
            id: Some(input.id),
            name: input.name.clone(),
            text: Some(input.text.clone()),
        }
    }
}

/// Partial reference to a model, as nested by the single-process endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Partial reference to a prompt, as nested by the single-process endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Quality judgment as embedded in result records
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EvaluationMark {
    pub quality: Quality,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One per-result entry in any endpoint's envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultRecord {
    /// Flattened as `output_id` by the bulk endpoints
    #[serde(default)]
    pub output_id: Option<i64>,
    /// The single-process shape flattens the output id to plain `id`
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub model_id: Option<i64>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model: Option<ModelRef>,
    #[serde(default)]
    pub prompt_id: Option<i64>,
    #[serde(default)]
    pub prompt_name: Option<String>,
    #[serde(default)]
    pub prompt: Option<PromptRef>,
    #[serde(default)]
    pub prompt_version_number: Option<i32>,
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub input: Option<InputRef>,
    #[serde(default)]
    pub input_id: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    /// Tolerated as any JSON value: old rows have been observed carrying
    /// strings here, and a bad value must degrade to "?" rather than fail
    /// the whole payload
    #[serde(default)]
    pub processing_time: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub evaluation: Option<EvaluationMark>,
}

/// Per-input envelope from the bulk processing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBundle {
    #[serde(default)]
    pub input_id: Option<i64>,
    #[serde(default)]
    pub input: Option<InputRef>,
    #[serde(default)]
    pub text: Option<String>,
    /// `prompt_results` in compare envelopes, `results` in process ones
    #[serde(default, alias = "results")]
    pub prompt_results: Vec<ResultRecord>,
}

impl ResultBundle {
    /// Graft the matching input from a fetched input set when the bundle
    /// carries only an `input_id`. The bulk endpoint omits the nested
    /// input object for stored inputs.
    pub fn augment_from(&mut self, inputs: &[Input]) {
        let needs_input = match &self.input {
            Some(input_ref) => input_ref.id.is_none(),
            None => true,
        };
        if !needs_input {
            return;
        }
        let Some(input_id) = self.input_id else {
            return;
        };
        if let Some(input) = inputs.iter().find(|i| i.id == input_id) {
            tracing::debug!(input_id, "augmenting bundle with input set data");
            self.input = Some(InputRef::from(input));
        }
    }

    fn sort_id(&self) -> i64 {
        self.input
            .as_ref()
            .and_then(|i| i.id)
            .or(self.input_id)
            .unwrap_or(0)
    }
}

/// Re-sort bundles newest input first, by numeric id. A documented
/// post-receipt step: the transport order is otherwise the source of truth.
pub fn sort_bundles_newest_first(bundles: &mut [ResultBundle]) {
    bundles.sort_by(|a, b| b.sort_id().cmp(&a.sort_id()));
}

/// Envelope returned by the input history endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputHistory {
    #[serde(default)]
    pub input: Option<InputRef>,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_compare_shape() {
        let bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 7,
            "input": {"id": 7, "name": "Memo", "text": "hello"},
            "prompt_results": [{
                "output_id": 42,
                "model_id": 1,
                "model_name": "gpt-4",
                "prompt_id": 2,
                "prompt_name": "Summary",
                "prompt_version_number": 3,
                "text": "a summary",
                "processing_time": 1.5,
                "created_at": "2025-05-01T12:00:00Z"
            }]
        }))
        .unwrap();

        assert_eq!(bundle.prompt_results.len(), 1);
        assert_eq!(bundle.prompt_results[0].output_id, Some(42));
    }

    #[test]
    fn deserializes_process_shape_with_results_alias() {
        let bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 3,
            "results": [{
                "id": 9,
                "model": {"id": 1, "name": "claude"},
                "prompt": {"id": 2, "name": "Bullets"},
                "text": "out",
                "processing_time": 0.25
            }]
        }))
        .unwrap();

        let record = &bundle.prompt_results[0];
        assert_eq!(record.id, Some(9));
        assert_eq!(record.output_id, None);
        assert_eq!(record.model.as_ref().unwrap().name.as_deref(), Some("claude"));
    }

    #[test]
    fn tolerates_sparse_records() {
        let record: ResultRecord = serde_json::from_value(serde_json::json!({
            "text": "only text",
            "processing_time": "fast"
        }))
        .unwrap();

        assert_eq!(record.output_id, None);
        assert!(record.processing_time.as_ref().unwrap().is_string());
    }

    #[test]
    fn augment_fills_missing_input_from_set() {
        let mut bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 5,
            "prompt_results": []
        }))
        .unwrap();
        let inputs = vec![Input {
            id: 5,
            name: Some("Voice memo".to_string()),
            text: "call mom".to_string(),
            created_at: None,
        }];

        bundle.augment_from(&inputs);

        let input = bundle.input.unwrap();
        assert_eq!(input.id, Some(5));
        assert_eq!(input.name.as_deref(), Some("Voice memo"));
    }

    #[test]
    fn augment_leaves_present_input_alone() {
        let mut bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 5,
            "input": {"id": 5, "name": "Original", "text": "keep me"},
            "prompt_results": []
        }))
        .unwrap();

        bundle.augment_from(&[Input {
            id: 5,
            name: Some("Replacement".to_string()),
            text: "clobber".to_string(),
            created_at: None,
        }]);

        assert_eq!(bundle.input.unwrap().name.as_deref(), Some("Original"));
    }

    #[test]
    fn bundles_sort_newest_input_first() {
        let mut bundles: Vec<ResultBundle> = serde_json::from_value(serde_json::json!([
            {"input_id": 2, "prompt_results": []},
            {"input_id": 9, "prompt_results": []},
            {"input_id": 4, "prompt_results": []}
        ]))
        .unwrap();

        sort_bundles_newest_first(&mut bundles);

        let ids: Vec<i64> = bundles.iter().map(|b| b.input_id.unwrap()).collect();
        assert_eq!(ids, vec![9, 4, 2]);
    }
}
