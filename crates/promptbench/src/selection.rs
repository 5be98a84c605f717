//! Selection State
//!
//! The working set for the next run: which models and prompts are chosen,
//! which input set is designated, and whether the run covers every input
//! in the set or an explicit subset. Selection controls live outside this
//! type; they feed changes in through `select`/`deselect` or rebuild the
//! whole set with `synchronize`.

use std::collections::{BTreeMap, BTreeSet};

/// Which kind of item a selection toggle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Model,
    Prompt,
}

/// Whether a run covers the whole input set or an explicit subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    All,
    Specific,
}

/// Working set of models, prompts and inputs for the next run
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    models: BTreeMap<i64, String>,
    prompts: BTreeMap<i64, String>,
    input_set: Option<i64>,
    input_mode: InputMode,
    chosen_inputs: BTreeSet<i64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: selecting an already-selected id updates its name
    pub fn select(&mut self, kind: SelectionKind, id: i64, name: impl Into<String>) {
        match kind {
            SelectionKind::Model => self.models.insert(id, name.into()),
            SelectionKind::Prompt => self.prompts.insert(id, name.into()),
        };
    }

    /// Deselecting an absent id is a no-op
    pub fn deselect(&mut self, kind: SelectionKind, id: i64) {
        match kind {
            SelectionKind::Model => self.models.remove(&id),
            SelectionKind::Prompt => self.prompts.remove(&id),
        };
    }

    /// Rebuild both sets wholesale from external controls
    pub fn synchronize(
        &mut self,
        models: impl IntoIterator<Item = (i64, String)>,
        prompts: impl IntoIterator<Item = (i64, String)>,
    ) {
        self.models = models.into_iter().collect();
        self.prompts = prompts.into_iter().collect();
    }

    pub fn set_input_set(&mut self, input_set: Option<i64>) {
        self.input_set = input_set;
    }

    /// Switching to Specific never auto-selects inputs; switching to All
    /// leaves any specific sub-selection in place but ignores it
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn choose_input(&mut self, id: i64) {
        self.chosen_inputs.insert(id);
    }

    pub fn unchoose_input(&mut self, id: i64) {
        self.chosen_inputs.remove(&id);
    }

    pub fn input_set(&self) -> Option<i64> {
        self.input_set
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn model_ids(&self) -> Vec<i64> {
        self.models.keys().copied().collect()
    }

    pub fn prompt_ids(&self) -> Vec<i64> {
        self.prompts.keys().copied().collect()
    }

    pub fn chosen_input_ids(&self) -> Vec<i64> {
        self.chosen_inputs.iter().copied().collect()
    }

    pub fn model_name(&self, id: i64) -> Option<&str> {
        self.models.get(&id).map(String::as_str)
    }

    pub fn prompt_name(&self, id: i64) -> Option<&str> {
        self.prompts.get(&id).map(String::as_str)
    }

    /// The one gate before a run: at least one model, at least one prompt,
    /// a designated input set, and in Specific mode at least one chosen
    /// input
    pub fn can_run(&self) -> bool {
        if self.models.is_empty() || self.prompts.is_empty() || self.input_set.is_none() {
            return false;
        }
        match self.input_mode {
            InputMode::All => true,
            InputMode::Specific => !self.chosen_inputs.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_state() -> SelectionState {
        let mut state = SelectionState::new();
        state.select(SelectionKind::Model, 1, "gpt-4");
        state.select(SelectionKind::Prompt, 2, "Summary");
        state.set_input_set(Some(7));
        state
    }

    #[test]
    fn can_run_requires_model_prompt_and_set() {
        let mut state = SelectionState::new();
        assert!(!state.can_run());

        state.select(SelectionKind::Model, 1, "gpt-4");
        assert!(!state.can_run());

        state.select(SelectionKind::Prompt, 2, "Summary");
        assert!(!state.can_run());

        state.set_input_set(Some(7));
        assert!(state.can_run());
    }

    #[test]
    fn specific_mode_requires_a_chosen_input() {
        let mut state = ready_state();
        state.set_input_mode(InputMode::Specific);
        assert!(!state.can_run());

        state.choose_input(3);
        assert!(state.can_run());

        state.unchoose_input(3);
        assert!(!state.can_run());
    }

    #[test]
    fn all_mode_ignores_specific_subselection() {
        let mut state = ready_state();
        state.set_input_mode(InputMode::Specific);
        state.choose_input(3);
        state.set_input_mode(InputMode::All);
        state.unchoose_input(3);
        assert!(state.can_run());
    }

    #[test]
    fn select_is_idempotent_and_deselect_of_absent_is_noop() {
        let mut state = ready_state();
        state.select(SelectionKind::Model, 1, "gpt-4");
        assert_eq!(state.model_ids(), vec![1]);

        state.deselect(SelectionKind::Model, 99);
        assert_eq!(state.model_ids(), vec![1]);

        state.deselect(SelectionKind::Model, 1);
        assert!(state.model_ids().is_empty());
        assert!(!state.can_run());
    }

    #[test]
    fn synchronize_rebuilds_wholesale() {
        let mut state = ready_state();
        state.synchronize(
            vec![(5, "claude".to_string())],
            vec![(6, "Bullets".to_string()), (8, "Email".to_string())],
        );
        assert_eq!(state.model_ids(), vec![5]);
        assert_eq!(state.prompt_ids(), vec![6, 8]);
        assert_eq!(state.model_name(1), None);
        assert_eq!(state.prompt_name(6), Some("Bullets"));
    }
}
