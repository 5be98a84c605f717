//! Evaluation submission state machine
//!
//! One slot per rendered result unit. The chosen quality is applied
//! optimistically when submission starts and rolled back to the prior
//! state if the backend call fails, so at most one quality is ever
//! "selected" at a time.

use crate::domain::errors::DomainError;
use crate::domain::value_objects::Quality;

/// Submission state of one result unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    Unevaluated,
    Submitting {
        prior: Option<Quality>,
        pending: Quality,
    },
    Evaluated(Quality),
}

/// Per-result evaluation slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSlot {
    state: EvalState,
}

impl EvaluationSlot {
    /// A slot seeded from a stored evaluation, if any
    pub fn new(existing: Option<Quality>) -> Self {
        Self {
            state: match existing {
                Some(quality) => EvalState::Evaluated(quality),
                None => EvalState::Unevaluated,
            },
        }
    }

    pub fn state(&self) -> &EvalState {
        &self.state
    }

    /// The quality currently shown as selected
    pub fn selected(&self) -> Option<Quality> {
        match self.state {
            EvalState::Unevaluated => None,
            EvalState::Submitting { pending, .. } => Some(pending),
            EvalState::Evaluated(quality) => Some(quality),
        }
    }

    /// Start a submission. Refused without an output id, and while an
    /// earlier submission is still in flight; both leave the state
    /// unchanged. On success the pending quality becomes the selection and
    /// the output id to submit is returned.
    pub fn begin(&mut self, output_id: Option<i64>, quality: Quality) -> Result<i64, DomainError> {
        let output_id = output_id.ok_or(DomainError::MissingOutputId)?;
        let prior = match self.state {
            EvalState::Unevaluated => None,
            EvalState::Evaluated(quality) => Some(quality),
            EvalState::Submitting { .. } => return Err(DomainError::SubmissionInFlight),
        };
        self.state = EvalState::Submitting {
            prior,
            pending: quality,
        };
        Ok(output_id)
    }

    /// The upsert succeeded: the pending quality becomes the evaluation
    pub fn complete(&mut self) {
        if let EvalState::Submitting { pending, .. } = self.state {
            self.state = EvalState::Evaluated(pending);
        }
    }

    /// The upsert failed: roll back to whatever was selected before
    pub fn fail(&mut self) {
        if let EvalState::Submitting { prior, .. } = self.state {
            self.state = match prior {
                Some(quality) => EvalState::Evaluated(quality),
                None => EvalState::Unevaluated,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_output_id_refuses_submission() {
        let mut slot = EvaluationSlot::new(None);
        let err = slot.begin(None, Quality::Good).unwrap_err();
        assert_eq!(err, DomainError::MissingOutputId);
        assert_eq!(slot.state(), &EvalState::Unevaluated);
        assert_eq!(slot.selected(), None);
    }

    #[test]
    fn successful_submission_evaluates() {
        let mut slot = EvaluationSlot::new(None);
        let id = slot.begin(Some(42), Quality::Good).unwrap();
        assert_eq!(id, 42);
        // Optimistic selection while in flight
        assert_eq!(slot.selected(), Some(Quality::Good));

        slot.complete();
        assert_eq!(slot.state(), &EvalState::Evaluated(Quality::Good));
    }

    #[test]
    fn failure_rolls_back_to_prior_quality() {
        let mut slot = EvaluationSlot::new(Some(Quality::Ok));
        slot.begin(Some(42), Quality::Bad).unwrap();
        assert_eq!(slot.selected(), Some(Quality::Bad));

        slot.fail();
        assert_eq!(slot.selected(), Some(Quality::Ok));
    }

    #[test]
    fn failure_without_prior_rolls_back_to_unevaluated() {
        let mut slot = EvaluationSlot::new(None);
        slot.begin(Some(42), Quality::Good).unwrap();
        slot.fail();
        assert_eq!(slot.state(), &EvalState::Unevaluated);
    }

    #[test]
    fn concurrent_submission_is_refused() {
        let mut slot = EvaluationSlot::new(None);
        slot.begin(Some(42), Quality::Good).unwrap();
        let err = slot.begin(Some(42), Quality::Bad).unwrap_err();
        assert_eq!(err, DomainError::SubmissionInFlight);
        // The in-flight pick stays selected
        assert_eq!(slot.selected(), Some(Quality::Good));
    }

    #[test]
    fn resubmitting_the_same_quality_converges() {
        let mut slot = EvaluationSlot::new(None);
        slot.begin(Some(42), Quality::Good).unwrap();
        slot.complete();
        slot.begin(Some(42), Quality::Good).unwrap();
        slot.complete();
        assert_eq!(slot.state(), &EvalState::Evaluated(Quality::Good));
    }
}
