//! Diff scanning pipeline: load, prompt, infer, decide.
//!
//! Provides the input loader, the fixed OWASP prompt, the inference API
//! client with response-shape normalization, verdict classification, and
//! the orchestration that ties them together.

pub mod input;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod verdict;
