//! Builtin tools exposed to the model.

mod company;
mod properties;

pub use company::{KristofInfoTool, RekaliberInfoTool};
pub use properties::{PropertyCountTool, PropertySearchTool};

use std::sync::Arc;

use storage::ChatStore;

use crate::Result;
use crate::registry::ToolRegistry;

/// Build the production registry: the two fixed company-info tools and
/// the two store-backed property tools.
pub fn default_registry(store: Arc<ChatStore>) -> Result<ToolRegistry> {
    ToolRegistry::new()
        .register(RekaliberInfoTool)?
        .register(KristofInfoTool)?
        .register(PropertySearchTool::new(Arc::clone(&store)))?
        .register(PropertyCountTool::new(store))
}
