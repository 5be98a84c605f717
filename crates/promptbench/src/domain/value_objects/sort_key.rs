//! SortKey - Which column a result grid is sorted by

use serde::{Deserialize, Serialize};

/// Sort column for result grids
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    InputName,
    ModelName,
    PromptName,
    ProcessingTime,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(SortKey::InputName),
            "model" => Ok(SortKey::ModelName),
            "prompt" => Ok(SortKey::PromptName),
            "time" => Ok(SortKey::ProcessingTime),
            _ => Err(format!(
                "Unknown sort key: {} (expected input, model, prompt or time)",
                s
            )),
        }
    }
}
