//! The two-phase orchestration loop.
//!
//! One turn: ask the model, detect a tool directive in its answer,
//! conditionally dispatch the tool, ask again with the result injected,
//! return the final answer. Exactly one tool may run per turn, and a
//! directive appearing in the second completion is never re-parsed.

use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::backend::{CompletionRequest, LlmBackend};
use crate::directive::parse_directive;
use crate::prompt;
use crate::registry::{DispatchResult, ToolRegistry};
use crate::{Error, Result};

const DEFAULT_DEADLINE: Duration = Duration::from_secs(120);

/// The result of one fully processed user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final answer text for the user.
    pub response: String,
    /// Name of the tool that ran, if any.
    pub tool_used: Option<String>,
    /// Raw tool payload; populated only in verbose mode.
    pub tool_result: Option<JsonValue>,
}

/// Drives the ask → detect → execute → re-ask → respond cycle.
///
/// Holds the model backend and the read-only tool registry; one
/// instance serves all requests.
pub struct Orchestrator<B: LlmBackend> {
    backend: B,
    registry: ToolRegistry,
    deadline: Duration,
    verbose: bool,
}

impl<B: LlmBackend> Orchestrator<B> {
    pub fn new(backend: B, registry: ToolRegistry) -> Self {
        Self {
            backend,
            registry,
            deadline: DEFAULT_DEADLINE,
            verbose: false,
        }
    }

    /// Bound each model completion by the given deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Include raw tool payloads in turn outcomes.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one user turn to completion.
    pub async fn run_turn(&self, user_message: &str) -> Result<TurnOutcome> {
        let system = prompt::system_prompt(self.registry.descriptors());
        let first = self.complete(user_message, Some(&system)).await?;

        let Some(call) = parse_directive(&first) else {
            debug!("No tool directive in model response");
            return Ok(TurnOutcome {
                response: first,
                tool_used: None,
                tool_result: None,
            });
        };

        info!(tool = %call.raw_name, "Model requested a tool");

        let tool = self
            .registry
            .resolve(&call.raw_name)
            .ok_or_else(|| Error::UnknownTool(call.raw_name.clone()))?;
        let name = tool.name().to_string();

        let payload = match self.registry.dispatch(tool, &call.params) {
            DispatchResult::Success { payload } => payload,
            DispatchResult::Failure { error } => {
                return Err(Error::ToolFailed {
                    name,
                    message: error,
                });
            }
        };

        // Tools may report a fault inside an otherwise successful payload.
        if let Some(message) = embedded_error(&payload) {
            return Err(Error::ToolFailed { name, message });
        }

        // An empty payload means the tool had nothing usable for this
        // turn; the loop stops here instead of asking the model again.
        if payload_is_empty(&payload) {
            return Err(Error::EmptyToolResult(name));
        }

        // The follow-up goes through the same system preamble as the
        // first call.
        let followup = prompt::tool_followup_prompt(&name, &payload, user_message);
        let response = self.complete(&followup, Some(&system)).await?;

        info!(tool = %name, "Turn completed with tool result");
        Ok(TurnOutcome {
            response,
            tool_used: Some(name),
            tool_result: self.verbose.then_some(payload),
        })
    }

    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let request = CompletionRequest { prompt, system };
        let text = tokio::time::timeout(self.deadline, self.backend.complete(request))
            .await
            .map_err(|_| Error::CompletionTimeout(self.deadline))??;

        if text.trim().is_empty() {
            return Err(Error::EmptyCompletion);
        }
        Ok(text)
    }
}

fn embedded_error(payload: &JsonValue) -> Option<String> {
    let error = payload.as_object()?.get("error")?;
    if payload_is_empty(error) {
        return None;
    }
    Some(match error {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    })
}

// Emptiness is falsy-style: null, false, zero, and empty strings,
// arrays, and objects all count as "nothing usable".
fn payload_is_empty(payload: &JsonValue) -> bool {
    match payload {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}
