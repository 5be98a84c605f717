//! Column sort over grid rows
//!
//! Stable, so ties keep their existing relative order. Rows with multiple
//! results sort by their first result, matching how the grid displays
//! them. Processing time compares numerically on the parsed display text;
//! an unparseable time (the `"?"` degradation) sorts after every number.

use std::cmp::Ordering;

use crate::domain::value_objects::SortKey;

use super::GridRow;

pub fn sort_rows(rows: &mut [GridRow], key: SortKey, ascending: bool) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

fn compare(a: &GridRow, b: &GridRow, key: SortKey) -> Ordering {
    match key {
        SortKey::InputName => a.input.name.cmp(&b.input.name),
        SortKey::ModelName => first_model(a).cmp(first_model(b)),
        SortKey::PromptName => first_prompt(a).cmp(first_prompt(b)),
        SortKey::ProcessingTime => parse_processing_time(first_time(a))
            .partial_cmp(&parse_processing_time(first_time(b)))
            .unwrap_or(Ordering::Equal),
    }
}

fn first_model(row: &GridRow) -> &str {
    row.results.first().map(|r| r.model_name.as_str()).unwrap_or("")
}

fn first_prompt(row: &GridRow) -> &str {
    row.results
        .first()
        .map(|r| r.prompt_label.as_str())
        .unwrap_or("")
}

fn first_time(row: &GridRow) -> &str {
    row.results
        .first()
        .map(|r| r.processing_time.as_str())
        .unwrap_or("")
}

/// Numeric value of a displayed processing time; INFINITY when it does
/// not parse so degraded rows sort last in ascending order
pub fn parse_processing_time(display: &str) -> f64 {
    display
        .trim()
        .trim_end_matches('s')
        .parse::<f64>()
        .unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{BundleView, ResultBundle};
    use crate::report::rows_from_bundles;

    fn row(input_name: &str, model: &str, time: serde_json::Value) -> GridRow {
        let bundle: ResultBundle = serde_json::from_value(serde_json::json!({
            "input_id": 1,
            "input": {"id": 1, "name": input_name, "text": "t"},
            "prompt_results": [{
                "output_id": 1,
                "model_name": model,
                "prompt_name": "p",
                "text": "x",
                "processing_time": time
            }]
        }))
        .unwrap();
        rows_from_bundles(vec![BundleView::from_bundle(&bundle)]).remove(0)
    }

    #[test]
    fn processing_time_sorts_numerically_not_lexicographically() {
        let mut rows = vec![
            row("a", "m", serde_json::json!(1.5)),
            row("b", "m", serde_json::json!(0.2)),
            row("c", "m", serde_json::json!(10.0)),
        ];

        sort_rows(&mut rows, SortKey::ProcessingTime, true);

        let times: Vec<&str> = rows.iter().map(|r| r.results[0].processing_time.as_str()).collect();
        assert_eq!(times, vec!["0.20", "1.50", "10.00"]);
    }

    #[test]
    fn unparseable_times_sort_last_ascending() {
        let mut rows = vec![
            row("a", "m", serde_json::json!("slow")),
            row("b", "m", serde_json::json!(3.0)),
        ];

        sort_rows(&mut rows, SortKey::ProcessingTime, true);
        assert_eq!(rows[0].results[0].processing_time, "3.00");
        assert_eq!(rows[1].results[0].processing_time, "?");
    }

    #[test]
    fn descending_reverses_the_order() {
        let mut rows = vec![
            row("alpha", "m", serde_json::json!(1.0)),
            row("beta", "m", serde_json::json!(1.0)),
        ];

        sort_rows(&mut rows, SortKey::InputName, false);
        assert_eq!(rows[0].input.name, "beta");
    }

    #[test]
    fn ties_keep_relative_order() {
        let mut rows = vec![
            row("same", "first", serde_json::json!(1.0)),
            row("same", "second", serde_json::json!(1.0)),
        ];

        sort_rows(&mut rows, SortKey::InputName, true);
        assert_eq!(rows[0].results[0].model_name, "first");
        assert_eq!(rows[1].results[0].model_name, "second");
    }
}
