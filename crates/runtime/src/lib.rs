//! Rekaliber runtime — the tool-invocation protocol and dispatch loop.
//!
//! The model cannot call tools directly. Instead it embeds a textual
//! directive (`[USAR_TOOL:nombre clave=valor ...]`) in its answer; this
//! crate recognizes the directive, resolves the requested tool against
//! the registry (tolerating the casing, accent, and spelling drift
//! models produce), coerces the parameters, dispatches the tool, and
//! drives the second model call that turns the tool's payload into a
//! natural answer.
//!
//! # Overview
//!
//! - [`parse_directive`] — extracts a [`DirectiveCall`] from model text;
//!   anything malformed is plain text, never an error.
//! - [`normalize`] and the alias table — map a model-supplied name to a
//!   registered tool.
//! - [`Value`] / [`coerce`] — best-effort typing of raw parameters.
//! - [`ToolRegistry`] — the immutable tool set, with ambiguity checked
//!   at registration and uniform [`DispatchResult`] capture.
//! - [`Orchestrator`] — the per-turn state machine
//!   (ask → detect → execute → re-ask → respond).
//! - [`LlmBackend`] / [`OllamaBackend`] — the model capability.
//! - [`tools`] — the builtin Rekaliber tools.
//!
//! # Example
//!
//! ```no_run
//! use runtime::{OllamaBackend, Orchestrator, tools};
//! use std::sync::Arc;
//! use storage::ChatStore;
//!
//! # async fn example() -> runtime::Result<()> {
//! let store = Arc::new(ChatStore::in_memory()?);
//! let registry = tools::default_registry(store)?;
//! let backend = OllamaBackend::builder("llama3.2:latest").build();
//!
//! let orchestrator = Orchestrator::new(backend, registry);
//! let outcome = orchestrator.run_turn("¿Qué es Rekaliber?").await?;
//! println!("{}", outcome.response);
//! # Ok(())
//! # }
//! ```

mod backend;
mod directive;
mod error;
mod orchestrator;
pub mod prompt;
mod registry;
mod resolver;
pub mod tools;
mod value;

pub use backend::{CompletionRequest, LlmBackend, OllamaBackend, OllamaBackendBuilder};
pub use directive::{DirectiveCall, OPEN_TOKEN, parse_directive};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, TurnOutcome};
pub use registry::{DispatchResult, Tool, ToolError, ToolRegistry};
pub use resolver::normalize;
pub use value::{Params, Value, coerce};
