//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::{error, info, warn};

use runtime::{Error as TurnError, LlmBackend};
use storage::{PropertyFilter, Role};

use crate::ServerState;
use crate::dto::{
    ChatRequestBody, ChatResponseBody, ConversationListResponse, ConversationsQuery,
    DebugDbQuery, DebugDbResponse, ErrorResponse, HealthResponse, MessageListResponse,
    ToolInfo, ToolListResponse,
};

type Rejection = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn server_error(message: impl Into<String>) -> Rejection {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a failed turn to the response body the caller sees.
///
/// Tool-shaped failures name the offending tool; model and transport
/// failures stay generic unless verbose mode is on.
fn turn_error_message(err: &TurnError, verbose: bool) -> String {
    match err {
        TurnError::UnknownTool(name) => format!("Tool '{name}' no encontrada"),
        TurnError::ToolFailed { name, message } => format!("Tool '{name}' error: {message}"),
        TurnError::EmptyToolResult(name) => format!("Tool '{name}' no produjo resultados"),
        other if verbose => other.to_string(),
        _ => "Internal server error".to_string(),
    }
}

pub async fn chat_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
    Json(payload): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, Rejection> {
    let message = match payload.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => return Err(bad_request("El campo \"message\" es requerido")),
    };

    info!(
        conversacion = payload.conversacion_id,
        usuario = payload.usuario_id,
        "Received /chat request"
    );

    let store = state.store();

    let usuario_id = match payload.usuario_id {
        Some(id) => id,
        None => store
            .get_or_create_user(storage::DEMO_USER_NAME, storage::DEMO_USER_EMAIL)
            .map_err(|e| {
                error!(%e, "Failed to resolve demo user");
                server_error("Internal server error")
            })?,
    };

    let conversacion_id = match payload.conversacion_id {
        Some(id) => id,
        None => {
            let titulo: String = message.chars().take(50).collect();
            store
                .create_conversation(usuario_id, Some(&titulo))
                .map_err(|e| {
                    error!(%e, "Failed to create conversation");
                    server_error("Internal server error")
                })?
        }
    };

    // Persistence is best-effort: a failed write never aborts the turn.
    if let Err(e) = store.append_message(conversacion_id, Role::User, &message) {
        warn!(%e, conversacion_id, "Failed to persist user message");
    }

    let outcome = match state.orchestrator().run_turn(&message).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(%err, "Turn failed");
            return Err(server_error(turn_error_message(&err, state.verbose())));
        }
    };

    if let Err(e) = store.append_message(conversacion_id, Role::Assistant, &outcome.response) {
        warn!(%e, conversacion_id, "Failed to persist assistant message");
    }

    info!(
        conversacion_id,
        tool_used = outcome.tool_used.as_deref(),
        "Turn completed"
    );

    Ok(Json(ChatResponseBody {
        response: outcome.response,
        conversacion_id,
        tool_used: outcome.tool_used,
        tool_result: outcome.tool_result,
    }))
}

pub async fn tools_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
) -> Json<ToolListResponse> {
    let tools = state
        .orchestrator()
        .registry()
        .descriptors()
        .map(|(nombre, descripcion)| ToolInfo {
            nombre: nombre.to_string(),
            descripcion: descripcion.to_string(),
        })
        .collect();
    Json(ToolListResponse { tools })
}

pub async fn health_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        modelo: state.model_name().to_string(),
        tools_disponibles: state.orchestrator().registry().len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Store probe for operators: runs a property search directly, without
/// going through the model.
pub async fn debug_db_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
    Query(query): Query<DebugDbQuery>,
) -> Result<Json<DebugDbResponse>, (StatusCode, Json<DebugDbResponse>)> {
    let filter = PropertyFilter {
        ciudad: query.ciudad,
        ..Default::default()
    };

    match state.store().search_properties(&filter) {
        Ok(properties) => Ok(Json(DebugDbResponse {
            ok: true,
            result: serde_json::to_value(properties).ok(),
            error: None,
        })),
        Err(e) => {
            error!(%e, "Database probe failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DebugDbResponse {
                    ok: false,
                    result: None,
                    error: Some(e.to_string()),
                }),
            ))
        }
    }
}

pub async fn list_conversations_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
    Query(query): Query<ConversationsQuery>,
) -> Result<Json<ConversationListResponse>, Rejection> {
    let conversaciones = state
        .store()
        .list_conversations(query.usuario_id, query.limite)
        .map_err(|e| {
            error!(%e, "Failed to list conversations");
            server_error("Internal server error")
        })?;
    Ok(Json(ConversationListResponse { conversaciones }))
}

pub async fn list_messages_handler<B: LlmBackend>(
    State(state): State<Arc<ServerState<B>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageListResponse>, Rejection> {
    let store = state.store();

    let exists = store.get_conversation(id).map_err(|e| {
        error!(%e, "Failed to load conversation");
        server_error("Internal server error")
    })?;
    if exists.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Conversación {id} no encontrada"),
            }),
        ));
    }

    let mensajes = store.list_messages(id, None).map_err(|e| {
        error!(%e, "Failed to list messages");
        server_error("Internal server error")
    })?;

    Ok(Json(MessageListResponse {
        conversacion_id: id,
        mensajes,
    }))
}
