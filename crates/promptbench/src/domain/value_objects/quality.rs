//! Quality - Human judgment of an output

use serde::{Deserialize, Serialize};

/// Quality rating attached to an output by a reviewer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Bad,
    Ok,
    Good,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Bad => write!(f, "bad"),
            Quality::Ok => write!(f, "ok"),
            Quality::Good => write!(f, "good"),
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bad" => Ok(Quality::Bad),
            "ok" => Ok(Quality::Ok),
            "good" => Ok(Quality::Good),
            _ => Err(format!("Unknown quality rating: {} (expected bad, ok or good)", s)),
        }
    }
}
