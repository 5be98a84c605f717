//! Canonical view records
//!
//! The single place where payload variance is absorbed: every view renders
//! from [`ResultView`] and [`InputView`], whatever endpoint the data came
//! from. Missing fields degrade to labels, never to a failure.

use chrono::{DateTime, Utc};

use super::record::{EvaluationMark, InputRef, ResultBundle, ResultRecord};
use super::{UNKNOWN_MODEL, UNKNOWN_PROMPT};

const UNNAMED_INPUT: &str = "Unnamed Input";
const NO_INPUT_TEXT: &str = "No text available";
const NO_OUTPUT_TEXT: &str = "No output text available";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// The input half of a rendered result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub id: Option<i64>,
    pub name: String,
    pub text: String,
}

impl InputView {
    /// Resolve an input from an optional nested reference plus the
    /// flattened fallbacks, first non-empty wins.
    pub fn resolve(input: Option<&InputRef>, input_id: Option<i64>, text: Option<&str>) -> Self {
        let id = input.and_then(|i| i.id).or(input_id);
        let name = non_empty(input.and_then(|i| i.name.as_deref()))
            .map(str::to_string)
            .or_else(|| id.map(|id| format!("Input #{}", id)))
            .unwrap_or_else(|| UNNAMED_INPUT.to_string());
        let text = non_empty(input.and_then(|i| i.text.as_deref()))
            .or_else(|| non_empty(text))
            .unwrap_or(NO_INPUT_TEXT)
            .to_string();
        Self { id, name, text }
    }

    /// Display form of the id, `"unknown"` when nothing resolved
    pub fn id_label(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "unknown".to_string(),
        }
    }
}

/// One normalized, renderable, evaluable result unit
#[derive(Debug, Clone)]
pub struct ResultView {
    pub output_id: Option<i64>,
    pub model_id: Option<i64>,
    pub prompt_id: Option<i64>,
    pub model_name: String,
    pub prompt_name: String,
    /// Prompt name with a ` (vN)` suffix when a version number is present
    pub prompt_label: String,
    pub version_number: Option<i32>,
    pub prompt_template: Option<String>,
    pub system_prompt: Option<String>,
    pub output_text: String,
    /// Two-decimal seconds, or `"?"` when the payload value was not numeric
    pub processing_time: String,
    pub created_at: DateTime<Utc>,
    pub evaluation: Option<EvaluationMark>,
}

impl ResultView {
    pub fn from_record(record: &ResultRecord) -> Self {
        let model_name = non_empty(record.model_name.as_deref())
            .or_else(|| non_empty(record.model.as_ref().and_then(|m| m.name.as_deref())))
            .unwrap_or(UNKNOWN_MODEL)
            .to_string();
        let prompt_name = non_empty(record.prompt_name.as_deref())
            .or_else(|| non_empty(record.prompt.as_ref().and_then(|p| p.name.as_deref())))
            .unwrap_or(UNKNOWN_PROMPT)
            .to_string();
        let prompt_label = match record.prompt_version_number {
            Some(version) => format!("{} (v{})", prompt_name, version),
            None => prompt_name.clone(),
        };

        Self {
            output_id: record.output_id.or(record.id),
            model_id: record
                .model_id
                .or_else(|| record.model.as_ref().and_then(|m| m.id)),
            prompt_id: record
                .prompt_id
                .or_else(|| record.prompt.as_ref().and_then(|p| p.id)),
            model_name,
            prompt_name,
            prompt_label,
            version_number: record.prompt_version_number,
            prompt_template: record.prompt_template.clone(),
            system_prompt: record.system_prompt.clone(),
            output_text: non_empty(record.text.as_deref())
                .unwrap_or(NO_OUTPUT_TEXT)
                .to_string(),
            processing_time: format_processing_time(record.processing_time.as_ref()),
            created_at: record.created_at.unwrap_or_else(Utc::now),
            evaluation: record.evaluation.clone(),
        }
    }

    /// Evaluation requires a definite output id - a hard precondition, not
    /// a fallback
    pub fn can_evaluate(&self) -> bool {
        self.output_id.is_some()
    }
}

fn format_processing_time(value: Option<&serde_json::Value>) -> String {
    match value.and_then(|v| v.as_f64()) {
        Some(seconds) => format!("{:.2}", seconds),
        None => "?".to_string(),
    }
}

/// One input with all of its normalized results
#[derive(Debug, Clone)]
pub struct BundleView {
    pub input: InputView,
    pub results: Vec<ResultView>,
}

impl BundleView {
    pub fn from_bundle(bundle: &ResultBundle) -> Self {
        Self {
            input: InputView::resolve(
                bundle.input.as_ref(),
                bundle.input_id,
                bundle.text.as_deref(),
            ),
            results: bundle
                .prompt_results
                .iter()
                .map(ResultView::from_record)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Quality;

    fn record(value: serde_json::Value) -> ResultRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_nested_input_falls_back_to_id_label() {
        let view = InputView::resolve(None, Some(17), None);
        assert_eq!(view.name, "Input #17");
        assert_eq!(view.id_label(), "17");
        assert_eq!(view.text, "No text available");
    }

    #[test]
    fn nothing_resolved_yields_unknown_labels() {
        let view = InputView::resolve(None, None, None);
        assert_eq!(view.name, "Unnamed Input");
        assert_eq!(view.id_label(), "unknown");
    }

    #[test]
    fn empty_name_is_treated_as_absent() {
        let input_ref: InputRef =
            serde_json::from_value(serde_json::json!({"id": 4, "name": "", "text": "t"})).unwrap();
        let view = InputView::resolve(Some(&input_ref), None, None);
        assert_eq!(view.name, "Input #4");
    }

    #[test]
    fn bundle_text_backfills_missing_input_text() {
        let bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 2,
            "text": "raw bundle text",
            "prompt_results": []
        }))
        .unwrap();
        let view = BundleView::from_bundle(&bundle);
        assert_eq!(view.input.text, "raw bundle text");
    }

    #[test]
    fn names_fall_back_to_unknown() {
        let view = ResultView::from_record(&record(serde_json::json!({"text": "x"})));
        assert_eq!(view.model_name, "Unknown model");
        assert_eq!(view.prompt_label, "Unknown prompt");
        assert_eq!(view.output_text, "x");
        assert!(!view.can_evaluate());
    }

    #[test]
    fn nested_model_and_prompt_are_used() {
        let view = ResultView::from_record(&record(serde_json::json!({
            "id": 1,
            "model": {"id": 5, "name": "claude"},
            "prompt": {"id": 6, "name": "Bullets"}
        })));
        assert_eq!(view.model_name, "claude");
        assert_eq!(view.model_id, Some(5));
        assert_eq!(view.prompt_id, Some(6));
        assert!(view.can_evaluate());
    }

    #[test]
    fn version_suffix_only_when_present() {
        let with_version = ResultView::from_record(&record(serde_json::json!({
            "prompt_name": "Summary",
            "prompt_version_number": 2
        })));
        assert_eq!(with_version.prompt_label, "Summary (v2)");

        let without = ResultView::from_record(&record(serde_json::json!({
            "prompt_name": "Summary"
        })));
        assert_eq!(without.prompt_label, "Summary");
    }

    #[test]
    fn non_numeric_processing_time_displays_question_mark() {
        let view = ResultView::from_record(&record(serde_json::json!({
            "processing_time": "slow"
        })));
        assert_eq!(view.processing_time, "?");

        let numeric = ResultView::from_record(&record(serde_json::json!({
            "processing_time": 1.5
        })));
        assert_eq!(numeric.processing_time, "1.50");
    }

    #[test]
    fn stored_evaluation_is_carried_through() {
        let view = ResultView::from_record(&record(serde_json::json!({
            "output_id": 3,
            "evaluation": {"quality": "good", "notes": "nice"}
        })));
        let mark = view.evaluation.unwrap();
        assert_eq!(mark.quality, Quality::Good);
        assert_eq!(mark.notes.as_deref(), Some("nice"));
    }
}
