//! Domain Entities
//!
//! Typed copies of the backend's records. All of them are created and owned
//! by the backend; the client holds transient, read-mostly copies.
//! - LlmModel: an identified LLM backend target
//! - Prompt / PromptVersion: named, versioned template families
//! - Input / InputSet: raw texts and their named collections
//! - Output / Evaluation: invocation results and quality judgments

mod input;
mod model;
mod output;
mod prompt;

pub use input::*;
pub use model::*;
pub use output::*;
pub use prompt::*;
