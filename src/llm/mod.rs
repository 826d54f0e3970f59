//! Intent routing, prompting and SQL extraction around the local LLM.

pub mod client;
pub mod extract;
pub mod intent;
pub mod prompt;

pub use client::{LlmBackend, LlmClient, OllamaHttpBackend, ProcessBackend, TimeoutPolicy};
pub use extract::{extract, CandidateStatement, ExtractionSource};
pub use intent::{classify, Intent, DATA_KEYWORDS};
pub use prompt::SqlPrompt;
