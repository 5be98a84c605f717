//! History Matrix Builder
//!
//! Reshapes one input's flat history into a dense model x prompt grid:
//! rows are the distinct models observed, columns the distinct prompts,
//! each cell the ordered history of that pair with the newest entry on
//! top. Pairs with no recorded outputs stay in the grid as explicit empty
//! cells so the grid is always complete over the filtered row/column sets.

use std::collections::BTreeSet;

use crate::presentation::{ResultRecord, ResultView, UNKNOWN_MODEL, UNKNOWN_PROMPT};

/// Column header: a prompt plus every version number observed under it
#[derive(Debug, Clone)]
pub struct PromptColumn {
    pub prompt_id: i64,
    pub name: String,
    pub versions: BTreeSet<i32>,
    /// Template from the first record observed for this prompt, for the
    /// view-prompt affordance
    pub template: Option<String>,
    pub system_prompt: Option<String>,
}

impl PromptColumn {
    /// Whether the header should carry a version badge
    pub fn has_versions(&self) -> bool {
        !self.versions.is_empty()
    }
}

/// One cell: the full ordered history for a (model, prompt) pair
#[derive(Debug, Clone, Default)]
pub struct MatrixCell {
    /// Newest first; empty means the pair has no recorded outputs
    pub entries: Vec<ResultView>,
}

impl MatrixCell {
    pub fn latest(&self) -> Option<&ResultView> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Older entries beyond the displayed latest one
    pub fn has_history(&self) -> bool {
        self.entries.len() > 1
    }
}

/// One row: a model and its cell per prompt column
#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub model_id: i64,
    pub model_name: String,
    pub cells: Vec<MatrixCell>,
}

/// The complete grid over the filtered model/prompt sets
#[derive(Debug, Clone, Default)]
pub struct HistoryMatrix {
    pub columns: Vec<PromptColumn>,
    pub rows: Vec<MatrixRow>,
}

impl HistoryMatrix {
    /// Build the grid from a flat history. Records missing a model or
    /// prompt id cannot be placed and are discarded. Filters narrow the
    /// row/column sets; an empty intersection yields an empty matrix and
    /// the caller shows a "no combinations" message.
    pub fn build(
        records: &[ResultRecord],
        model_filter: Option<i64>,
        prompt_filter: Option<i64>,
    ) -> Self {
        let placeable: Vec<(i64, i64, ResultView)> = records
            .iter()
            .filter_map(|record| {
                let view = ResultView::from_record(record);
                match (view.model_id, view.prompt_id) {
                    (Some(model_id), Some(prompt_id)) => Some((model_id, prompt_id, view)),
                    _ => None,
                }
            })
            .collect();

        // Distinct models and prompts in first-observed order
        let mut models: Vec<(i64, String)> = Vec::new();
        let mut prompts: Vec<(i64, String)> = Vec::new();
        for (model_id, prompt_id, view) in &placeable {
            if !models.iter().any(|(id, _)| id == model_id) {
                models.push((*model_id, display_model_name(view, *model_id)));
            }
            if !prompts.iter().any(|(id, _)| id == prompt_id) {
                prompts.push((*prompt_id, display_prompt_name(view, *prompt_id)));
            }
        }

        if let Some(filter) = model_filter {
            models.retain(|(id, _)| *id == filter);
        }
        if let Some(filter) = prompt_filter {
            prompts.retain(|(id, _)| *id == filter);
        }

        let columns: Vec<PromptColumn> = prompts
            .into_iter()
            .map(|(prompt_id, name)| {
                let versions = placeable
                    .iter()
                    .filter(|(_, pid, _)| *pid == prompt_id)
                    .filter_map(|(_, _, view)| view.version_number)
                    .collect();
                let sample = placeable
                    .iter()
                    .find(|(_, pid, view)| *pid == prompt_id && view.prompt_template.is_some());
                PromptColumn {
                    prompt_id,
                    name,
                    versions,
                    template: sample.and_then(|(_, _, view)| view.prompt_template.clone()),
                    system_prompt: sample.and_then(|(_, _, view)| view.system_prompt.clone()),
                }
            })
            .collect();

        let rows = models
            .into_iter()
            .map(|(model_id, model_name)| {
                let cells = columns
                    .iter()
                    .map(|column| {
                        let mut entries: Vec<ResultView> = placeable
                            .iter()
                            .filter(|(mid, pid, _)| *mid == model_id && *pid == column.prompt_id)
                            .map(|(_, _, view)| view.clone())
                            .collect();
                        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                        MatrixCell { entries }
                    })
                    .collect();
                MatrixRow {
                    model_id,
                    model_name,
                    cells,
                }
            })
            .collect();

        Self { columns, rows }
    }

    /// True when filtering left no combinations to show
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

fn display_model_name(view: &ResultView, model_id: i64) -> String {
    if view.model_name == UNKNOWN_MODEL {
        format!("Model {}", model_id)
    } else {
        view.model_name.clone()
    }
}

fn display_prompt_name(view: &ResultView, prompt_id: i64) -> String {
    if view.prompt_name == UNKNOWN_PROMPT {
        format!("Prompt {}", prompt_id)
    } else {
        view.prompt_name.clone()
    }
}

/// Distinct (id, name) pairs observed in a history, in first-observed
/// order, for populating the model/prompt filter controls
pub fn filter_options(records: &[ResultRecord]) -> (Vec<(i64, String)>, Vec<(i64, String)>) {
    let mut models: Vec<(i64, String)> = Vec::new();
    let mut prompts: Vec<(i64, String)> = Vec::new();
    for record in records {
        let view = ResultView::from_record(record);
        if let Some(model_id) = view.model_id {
            if !models.iter().any(|(id, _)| *id == model_id) {
                models.push((model_id, display_model_name(&view, model_id)));
            }
        }
        if let Some(prompt_id) = view.prompt_id {
            if !prompts.iter().any(|(id, _)| *id == prompt_id) {
                prompts.push((prompt_id, display_prompt_name(&view, prompt_id)));
            }
        }
    }
    (models, prompts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        output_id: i64,
        model: (i64, &str),
        prompt: (i64, &str),
        created_at: &str,
    ) -> ResultRecord {
        serde_json::from_value(serde_json::json!({
            "output_id": output_id,
            "model_id": model.0,
            "model_name": model.1,
            "prompt_id": prompt.0,
            "prompt_name": prompt.1,
            "text": format!("output {}", output_id),
            "created_at": created_at
        }))
        .unwrap()
    }

    #[test]
    fn grid_is_complete_with_explicit_empty_cells() {
        // Models {A=1, B=2} x prompts {X=10, Y=11}, (B, Y) never run
        let records = vec![
            record(1, (1, "A"), (10, "X"), "2025-05-01T10:00:00Z"),
            record(2, (1, "A"), (11, "Y"), "2025-05-01T10:01:00Z"),
            record(3, (2, "B"), (10, "X"), "2025-05-01T10:02:00Z"),
        ];

        let matrix = HistoryMatrix::build(&records, None, None);

        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.columns.len(), 2);
        let cells: Vec<&MatrixCell> = matrix.rows.iter().flat_map(|r| &r.cells).collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells.iter().filter(|c| !c.is_empty()).count(), 3);
        assert_eq!(cells.iter().filter(|c| c.is_empty()).count(), 1);

        // The empty cell is exactly (B, Y)
        let row_b = matrix.rows.iter().find(|r| r.model_id == 2).unwrap();
        let y_index = matrix
            .columns
            .iter()
            .position(|c| c.prompt_id == 11)
            .unwrap();
        assert!(row_b.cells[y_index].is_empty());
    }

    #[test]
    fn cell_shows_latest_and_orders_history_descending() {
        let records = vec![
            record(1, (1, "A"), (10, "X"), "2025-05-01T10:00:00Z"),
            record(2, (1, "A"), (10, "X"), "2025-05-03T10:00:00Z"),
            record(3, (1, "A"), (10, "X"), "2025-05-02T10:00:00Z"),
        ];

        let matrix = HistoryMatrix::build(&records, None, None);
        let cell = &matrix.rows[0].cells[0];

        assert!(cell.has_history());
        assert_eq!(cell.latest().unwrap().output_id, Some(2));
        let order: Vec<i64> = cell.entries.iter().filter_map(|e| e.output_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn records_without_placement_ids_are_discarded() {
        let placeless: ResultRecord =
            serde_json::from_value(serde_json::json!({"output_id": 9, "text": "stray"})).unwrap();
        let records = vec![
            record(1, (1, "A"), (10, "X"), "2025-05-01T10:00:00Z"),
            placeless,
        ];

        let matrix = HistoryMatrix::build(&records, None, None);
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.columns.len(), 1);
        assert_eq!(matrix.rows[0].cells[0].entries.len(), 1);
    }

    #[test]
    fn disjoint_filters_yield_empty_matrix() {
        let records = vec![record(1, (1, "A"), (10, "X"), "2025-05-01T10:00:00Z")];
        let matrix = HistoryMatrix::build(&records, Some(99), None);
        assert!(matrix.is_empty());
    }

    #[test]
    fn column_collects_distinct_versions() {
        let mut with_version: ResultRecord = serde_json::from_value(serde_json::json!({
            "output_id": 1,
            "model_id": 1, "model_name": "A",
            "prompt_id": 10, "prompt_name": "X",
            "prompt_version_number": 2,
            "created_at": "2025-05-01T10:00:00Z"
        }))
        .unwrap();
        let records = vec![
            with_version.clone(),
            {
                with_version.prompt_version_number = Some(3);
                with_version.output_id = Some(2);
                with_version
            },
            record(3, (1, "A"), (10, "X"), "2025-05-01T11:00:00Z"),
        ];

        let matrix = HistoryMatrix::build(&records, None, None);
        let column = &matrix.columns[0];
        assert_eq!(column.versions.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert!(column.has_versions());
    }

    #[test]
    fn filter_options_are_distinct_in_observed_order() {
        let records = vec![
            record(1, (2, "B"), (11, "Y"), "2025-05-01T10:00:00Z"),
            record(2, (1, "A"), (10, "X"), "2025-05-01T10:01:00Z"),
            record(3, (2, "B"), (10, "X"), "2025-05-01T10:02:00Z"),
        ];

        let (models, prompts) = filter_options(&records);
        assert_eq!(models, vec![(2, "B".to_string()), (1, "A".to_string())]);
        assert_eq!(prompts, vec![(11, "Y".to_string()), (10, "X".to_string())]);
    }
}
