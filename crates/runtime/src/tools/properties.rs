//! Store-backed property tools.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use storage::{ChatStore, PropertyFilter};

use crate::registry::{Tool, ToolError};
use crate::value::Params;

/// Searches the property catalogue by type, city, and maximum price.
pub struct PropertySearchTool {
    store: Arc<ChatStore>,
}

impl PropertySearchTool {
    pub fn new(store: Arc<ChatStore>) -> Self {
        Self { store }
    }
}

impl Tool for PropertySearchTool {
    fn name(&self) -> &str {
        "buscar_propiedades"
    }

    fn description(&self) -> &str {
        "Busca propiedades disponibles en la base de datos. Parámetros \
         opcionales: tipo (Casa, Departamento, Terreno), ciudad (La Paz, \
         Santa Cruz, Cochabamba) y precio_max en dólares."
    }

    fn invoke(&self, params: &Params) -> Result<JsonValue, ToolError> {
        let filter = PropertyFilter {
            tipo: params.get("tipo").and_then(|v| v.as_str()).map(str::to_string),
            ciudad: params
                .get("ciudad")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            precio_max: params.get("precio_max").and_then(|v| v.as_f64()),
        };

        let properties = self.store.search_properties(&filter)?;
        serde_json::to_value(properties).map_err(|e| ToolError::Execution(e.to_string()))
    }
}

/// Counts available properties, total and per type, optionally for one
/// city.
pub struct PropertyCountTool {
    store: Arc<ChatStore>,
}

impl PropertyCountTool {
    pub fn new(store: Arc<ChatStore>) -> Self {
        Self { store }
    }
}

impl Tool for PropertyCountTool {
    fn name(&self) -> &str {
        "contar_propiedades"
    }

    fn description(&self) -> &str {
        "Cuenta cuántas propiedades hay disponibles, en total y por tipo. \
         Parámetro opcional: ciudad."
    }

    fn invoke(&self, params: &Params) -> Result<JsonValue, ToolError> {
        let ciudad = params.get("ciudad").and_then(|v| v.as_str());
        let count = self.store.count_properties(ciudad)?;
        serde_json::to_value(count).map_err(|e| ToolError::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn store() -> Arc<ChatStore> {
        let store = ChatStore::in_memory().unwrap();
        store.seed_demo_data().unwrap();
        Arc::new(store)
    }

    #[test]
    fn search_applies_coerced_params() {
        let tool = PropertySearchTool::new(store());

        let mut params = Params::new();
        params.insert("tipo".into(), Value::Str("Casa".into()));
        params.insert("ciudad".into(), Value::Str("Cochabamba".into()));
        params.insert("precio_max".into(), Value::Int(200000));

        let payload = tool.invoke(&params).unwrap();
        let rows = payload.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["ciudad"], "Cochabamba");
        assert_eq!(rows[0]["tipo"], "Casa");
    }

    #[test]
    fn search_without_params_returns_everything_available() {
        let tool = PropertySearchTool::new(store());
        let payload = tool.invoke(&Params::new()).unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 6);
    }

    #[test]
    fn search_can_come_back_empty() {
        let tool = PropertySearchTool::new(store());

        let mut params = Params::new();
        params.insert("ciudad".into(), Value::Str("Tarija".into()));

        let payload = tool.invoke(&params).unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 0);
    }

    #[test]
    fn count_reports_totals_and_breakdown() {
        let tool = PropertyCountTool::new(store());

        let payload = tool.invoke(&Params::new()).unwrap();
        assert_eq!(payload["total"], 6);
        assert_eq!(payload["por_tipo"]["Casa"], 3);

        let mut params = Params::new();
        params.insert("ciudad".into(), Value::Str("La Paz".into()));
        let payload = tool.invoke(&params).unwrap();
        assert_eq!(payload["total"], 4);
        assert_eq!(payload["ciudad"], "La Paz");
    }
}
