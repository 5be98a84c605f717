//! Promptbench Domain Library
//!
//! Client-side core for evaluating LLM outputs across prompt templates and
//! input texts. The backend performs model invocation, prompt rendering and
//! persistence; this crate owns everything in front of it:
//!
//! - **Domain** (`domain/`): typed copies of the backend's records
//!   - `entities/`: LlmModel, Prompt, PromptVersion, Input, InputSet,
//!     Output, Evaluation
//!   - `value_objects/`: Quality, SortKey
//!   - `errors`: client-side domain errors
//! - **Presentation** (`presentation/`): the loose wire records returned by
//!   the processing endpoints, their normalization into one canonical
//!   renderable view, and the per-result evaluation state machine
//! - **Selection** (`selection`): the working set of models, prompts and
//!   inputs for the next run
//! - **Matrix / Timeline** (`matrix`, `timeline`): history reshaped into a
//!   model x prompt grid or a day-grouped timeline
//! - **Report** (`report/`): CSV export, column sort and row filter over a
//!   rendered result set

pub mod domain;
pub mod matrix;
pub mod presentation;
pub mod report;
pub mod selection;
pub mod timeline;

// Re-export commonly used types
pub use domain::{
    DomainError, Evaluation, Input, InputSet, InputSetDetail, LlmModel, Output, Prompt,
    PromptDetail, PromptVersion, Quality, SortKey,
};
pub use matrix::{filter_options, HistoryMatrix, MatrixCell, MatrixRow, PromptColumn};
pub use presentation::{
    sort_bundles_newest_first, BundleView, EvalState, EvaluationMark, EvaluationSlot, InputHistory,
    InputRef, InputView, ResultBundle, ResultRecord, ResultView,
};
pub use report::{
    apply_filter, export_csv, export_filename, rows_from_bundles, sort_rows, GridRow, CSV_HEADER,
};
pub use selection::{InputMode, SelectionKind, SelectionState};
pub use timeline::{build_timeline, TimelineDay};
