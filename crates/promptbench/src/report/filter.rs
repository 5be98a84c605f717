//! Substring filter over grid rows
//!
//! Case-insensitive match against the input name and text. Non-matching
//! rows are hidden, not removed, so clearing the filter restores the full
//! set without a re-fetch.

use super::GridRow;

pub fn apply_filter(rows: &mut [GridRow], needle: &str) {
    let needle = needle.to_lowercase();
    for row in rows {
        row.visible = needle.is_empty() || row_matches(row, &needle);
    }
}

fn row_matches(row: &GridRow, needle_lower: &str) -> bool {
    row.input.name.to_lowercase().contains(needle_lower)
        || row.input.text.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{BundleView, ResultBundle};
    use crate::report::rows_from_bundles;

    fn rows() -> Vec<GridRow> {
        let bundles: Vec<ResultBundle> = serde_json::from_value(serde_json::json!([
            {"input_id": 1, "input": {"id": 1, "name": "Meeting notes", "text": "discuss budget"}, "prompt_results": []},
            {"input_id": 2, "input": {"id": 2, "name": "Voice memo", "text": "call the Bank"}, "prompt_results": []}
        ]))
        .unwrap();
        rows_from_bundles(bundles.iter().map(BundleView::from_bundle).collect())
    }

    #[test]
    fn filter_is_case_insensitive_over_name_and_text() {
        let mut rows = rows();
        apply_filter(&mut rows, "BANK");
        assert!(!rows[0].visible);
        assert!(rows[1].visible);

        apply_filter(&mut rows, "meeting");
        assert!(rows[0].visible);
        assert!(!rows[1].visible);
    }

    #[test]
    fn clearing_the_filter_restores_all_rows() {
        let mut rows = rows();
        apply_filter(&mut rows, "nothing matches this");
        assert!(rows.iter().all(|r| !r.visible));

        apply_filter(&mut rows, "");
        assert!(rows.iter().all(|r| r.visible));
    }
}
