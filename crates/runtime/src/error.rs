use std::time::Duration;

use thiserror::Error;

/// Turn-level errors.
///
/// Each variant is a distinct terminal state of the orchestration loop:
/// a missing tool, a failing tool, and a tool with nothing to say are
/// reported differently even though all three end the turn.
#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("model completion timed out after {0:?}")]
    CompletionTimeout(Duration),

    #[error("tool not found: {0}")]
    UnknownTool(String),

    #[error("tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error("tool '{0}' produced no usable result")]
    EmptyToolResult(String),

    #[error("tool names '{first}' and '{second}' both normalize to '{key}'")]
    AmbiguousToolName {
        first: String,
        second: String,
        key: String,
    },

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
