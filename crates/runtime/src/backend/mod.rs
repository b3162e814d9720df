//! Model backend abstraction.
//!
//! The language model is an external collaborator: a black-box
//! `complete(prompt) -> text` capability that may be slow and
//! non-deterministic, and whose output is untrusted free text. The
//! trait keeps the orchestration loop independent of any provider.

mod ollama;

pub use ollama::{OllamaBackend, OllamaBackendBuilder};

use std::future::Future;

use crate::Result;

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
}

/// Trait for model backends.
pub trait LlmBackend: Send + Sync {
    /// Send a prompt and return the model's text response.
    fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> impl Future<Output = Result<String>> + Send;
}
