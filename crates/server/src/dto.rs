//! Request and response bodies for the HTTP surface.
//!
//! Field names are the wire format existing clients already speak
//! (`conversacion_id`, `tool_used`, ...), so they stay Spanish.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use storage::{Conversation, StoredMessage};

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Required; validated by hand so a missing field yields a 400 with
    /// a readable message instead of an extractor rejection.
    pub message: Option<String>,
    pub conversacion_id: Option<i64>,
    pub usuario_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub conversacion_id: i64,
    pub tool_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub nombre: String,
    pub descripcion: String,
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub modelo: String,
    pub tools_disponibles: usize,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DebugDbQuery {
    pub ciudad: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DebugDbResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsQuery {
    pub usuario_id: i64,
    #[serde(default = "default_conversation_limit")]
    pub limite: usize,
}

fn default_conversation_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversaciones: Vec<Conversation>,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub conversacion_id: i64,
    pub mensajes: Vec<StoredMessage>,
}
