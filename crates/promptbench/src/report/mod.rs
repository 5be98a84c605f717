//! Export, sort and filter utilities over a rendered result set

mod csv;
mod filter;
mod sort;

pub use csv::*;
pub use filter::*;
pub use sort::*;

use crate::presentation::{BundleView, InputView, ResultView};

/// One grid row: an input, its results, and a visibility flag owned by
/// the filter. Hiding is presentational and reversible; the row's data
/// never changes.
#[derive(Debug, Clone)]
pub struct GridRow {
    pub input: InputView,
    pub results: Vec<ResultView>,
    pub visible: bool,
}

impl From<BundleView> for GridRow {
    fn from(bundle: BundleView) -> Self {
        Self {
            input: bundle.input,
            results: bundle.results,
            visible: true,
        }
    }
}

pub fn rows_from_bundles(bundles: Vec<BundleView>) -> Vec<GridRow> {
    bundles.into_iter().map(GridRow::from).collect()
}
