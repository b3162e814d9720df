//! Tool registry and uniform dispatch.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

use crate::resolver::{alias_target, normalize};
use crate::value::Params;
use crate::{Error, Result};

/// Errors a tool can raise during invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Execution(String),
}

impl From<storage::Error> for ToolError {
    fn from(source: storage::Error) -> Self {
        ToolError::Execution(source.to_string())
    }
}

/// A named, independently invocable capability.
///
/// The name is the sole identity used for resolution and must be stable;
/// the description feeds the model's system preamble. Implementations
/// are registered once at startup and invoked synchronously.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn invoke(&self, params: &Params) -> std::result::Result<JsonValue, ToolError>;
}

/// Outcome of dispatching a tool call.
///
/// Exactly one side is meaningful: a payload on success, a message on
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Success { payload: JsonValue },
    Failure { error: String },
}

impl DispatchResult {
    pub fn ok(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }
}

/// The immutable set of tools available to the model.
///
/// Populated once at process start and shared read-only afterwards.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("index", &self.index)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// Two tools whose names normalize to the same key would make
    /// resolution ambiguous; that is rejected here, at construction.
    pub fn register(mut self, tool: impl Tool + 'static) -> Result<Self> {
        let key = normalize(tool.name());
        if let Some(&existing) = self.index.get(&key) {
            return Err(Error::AmbiguousToolName {
                first: self.tools[existing].name().to_string(),
                second: tool.name().to_string(),
                key,
            });
        }
        self.index.insert(key, self.tools.len());
        self.tools.push(Box::new(tool));
        Ok(self)
    }

    /// Resolve a model-supplied name to a registered tool.
    ///
    /// Exact match on the normalized name first, then one retry through
    /// the alias table.
    pub fn resolve(&self, raw_name: &str) -> Option<&dyn Tool> {
        let key = normalize(raw_name);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let canonical = alias_target(&key)?;
                debug!(requested = raw_name, alias = canonical, "Resolved tool via alias");
                *self.index.get(&normalize(canonical))?
            }
        };
        Some(self.tools[idx].as_ref())
    }

    /// Invoke a resolved tool, capturing success or failure uniformly.
    ///
    /// Call-level faults are data, not control flow: a failing tool
    /// never propagates an error out of dispatch.
    pub fn dispatch(&self, tool: &dyn Tool, params: &Params) -> DispatchResult {
        match tool.invoke(params) {
            Ok(payload) => DispatchResult::Success { payload },
            Err(error) => {
                warn!(tool = tool.name(), %error, "Tool invocation failed");
                DispatchResult::Failure {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Registered tools as (name, description) pairs.
    pub fn descriptors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools.iter().map(|t| (t.name(), t.description()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
