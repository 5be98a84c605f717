//! Prompt - Named, versioned prompt template families
//!
//! A prompt's template text carries an `{{input}}` placeholder the backend
//! substitutes at processing time. Edits never overwrite history: every
//! edit creates a new PromptVersion with the next version number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prompt template family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One immutable revision of a prompt's template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: i64,
    pub prompt_id: i64,
    pub version_number: i32,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A prompt together with its full version list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDetail {
    pub id: i64,
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub versions: Vec<PromptVersion>,
}

impl PromptDetail {
    /// The version with the highest version number, shown by default
    pub fn latest_version(&self) -> Option<&PromptVersion> {
        self.versions.iter().max_by_key(|v| v.version_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: i64, number: i32) -> PromptVersion {
        PromptVersion {
            id,
            prompt_id: 1,
            version_number: number,
            template: format!("v{} template {{{{input}}}}", number),
            system_prompt: None,
            created_at: None,
        }
    }

    #[test]
    fn latest_version_picks_highest_number() {
        let detail = PromptDetail {
            id: 1,
            name: "Summary".to_string(),
            template: "t".to_string(),
            description: None,
            versions: vec![version(10, 1), version(12, 3), version(11, 2)],
        };
        assert_eq!(detail.latest_version().unwrap().version_number, 3);
    }

    #[test]
    fn adding_a_version_grows_the_list_by_one() {
        let mut detail = PromptDetail {
            id: 1,
            name: "Summary".to_string(),
            template: "t".to_string(),
            description: None,
            versions: vec![version(10, 1), version(11, 2)],
        };
        let before: Vec<i64> = detail.versions.iter().map(|v| v.id).collect();

        detail.versions.push(version(12, 3));

        assert_eq!(detail.versions.len(), before.len() + 1);
        // Prior versions are untouched
        for id in before {
            assert!(detail.versions.iter().any(|v| v.id == id));
        }
        assert_eq!(detail.latest_version().unwrap().id, 12);
    }
}
