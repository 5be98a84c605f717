//! CSV export of a result grid
//!
//! One row per (input, output) pair present in the set; inputs with zero
//! outputs contribute zero rows. Fields are quoted with doubled embedded
//! quotes, so commas and newlines inside free text survive a round trip.

use chrono::NaiveDate;

use super::GridRow;

pub const CSV_HEADER: &str =
    "Input,Input Text,Model,Prompt,Version,Output,Processing Time (s),Timestamp,Evaluation";

/// Serialize the grid. The header row is always present, even for an
/// empty result set.
pub fn export_csv(rows: &[GridRow]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for row in rows {
        for result in &row.results {
            let version = result
                .version_number
                .map(|v| v.to_string())
                .unwrap_or_default();
            let evaluation = result
                .evaluation
                .as_ref()
                .map(|mark| mark.quality.to_string())
                .unwrap_or_else(|| "not evaluated".to_string());
            let timestamp = result.created_at.format("%Y-%m-%d %H:%M:%S").to_string();

            let fields = [
                quote(&row.input.name),
                quote(&row.input.text),
                quote(&result.model_name),
                quote(&result.prompt_name),
                quote(&version),
                quote(&result.output_text),
                result.processing_time.clone(),
                quote(&timestamp),
                quote(&evaluation),
            ];
            csv.push_str(&fields.join(","));
            csv.push('\n');
        }
    }

    csv
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Download name for an export created on the given date
pub fn export_filename(date: NaiveDate) -> String {
    format!("batch-evaluation-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{BundleView, ResultBundle};
    use crate::report::rows_from_bundles;

    fn rows(value: serde_json::Value) -> Vec<GridRow> {
        let bundles: Vec<ResultBundle> = serde_json::from_value(value).unwrap();
        rows_from_bundles(bundles.iter().map(BundleView::from_bundle).collect())
    }

    #[test]
    fn empty_result_set_exports_header_only() {
        let csv = export_csv(&[]);
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn inputs_without_outputs_contribute_no_rows() {
        let csv = export_csv(&rows(serde_json::json!([
            {"input_id": 1, "input": {"id": 1, "name": "Empty", "text": "t"}, "prompt_results": []}
        ])));
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn one_row_per_output_with_all_fields() {
        let csv = export_csv(&rows(serde_json::json!([{
            "input_id": 1,
            "input": {"id": 1, "name": "Memo", "text": "call mom"},
            "prompt_results": [{
                "output_id": 10,
                "model_name": "gpt-4",
                "prompt_name": "Summary",
                "prompt_version_number": 2,
                "text": "ok",
                "processing_time": 1.234,
                "created_at": "2025-05-01T12:30:00Z",
                "evaluation": {"quality": "good"}
            }, {
                "output_id": 11,
                "model_name": "claude",
                "prompt_name": "Bullets",
                "text": "fine",
                "processing_time": 0.5,
                "created_at": "2025-05-01T12:31:00Z"
            }]
        }])));

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"Memo\",\"call mom\",\"gpt-4\",\"Summary\",\"2\",\"ok\",1.23,\"2025-05-01 12:30:00\",\"good\""
        );
        assert!(lines[2].ends_with("\"not evaluated\""));
        assert!(lines[2].contains("\"\"")); // empty version field
    }

    #[test]
    fn commas_quotes_and_newlines_survive_quoting() {
        let csv = export_csv(&rows(serde_json::json!([{
            "input_id": 1,
            "input": {"id": 1, "name": "A, B", "text": "line one\nline \"two\""},
            "prompt_results": [{
                "output_id": 10,
                "model_name": "m",
                "prompt_name": "p",
                "text": "x",
                "processing_time": 1.0,
                "created_at": "2025-05-01T12:30:00Z"
            }]
        }])));

        assert!(csv.contains("\"A, B\""));
        assert!(csv.contains("\"line one\nline \"\"two\"\"\""));
    }
}
