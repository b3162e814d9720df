//! HTTP surface for the Rekaliber chat service.
//!
//! A thin axum layer over the runtime: `/chat` drives one orchestration
//! turn per request, the rest are read-only probes over the registry and
//! the store. Wire format (Spanish field names, status codes) matches
//! what existing clients expect.

mod dto;
mod error;
mod routes;

pub use error::ServerError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use runtime::{LlmBackend, Orchestrator};
use storage::ChatStore;

/// Shared per-process state: the orchestrator, the store, and the bits
/// of configuration the handlers report back.
pub struct ServerState<B: LlmBackend> {
    orchestrator: Orchestrator<B>,
    store: Arc<ChatStore>,
    model_name: String,
    verbose: bool,
}

impl<B: LlmBackend> ServerState<B> {
    pub fn new(
        orchestrator: Orchestrator<B>,
        store: Arc<ChatStore>,
        model_name: impl Into<String>,
        verbose: bool,
    ) -> Self {
        Self {
            orchestrator,
            store,
            model_name: model_name.into(),
            verbose,
        }
    }

    pub(crate) fn orchestrator(&self) -> &Orchestrator<B> {
        &self.orchestrator
    }

    pub(crate) fn store(&self) -> &ChatStore {
        &self.store
    }

    pub(crate) fn model_name(&self) -> &str {
        &self.model_name
    }

    pub(crate) fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Build the application router.
pub fn router<B>(state: Arc<ServerState<B>>) -> Router
where
    B: LlmBackend + 'static,
{
    // The service is fully open to browser clients.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(routes::chat_handler::<B>))
        .route("/tools", get(routes::tools_handler::<B>))
        .route("/health", get(routes::health_handler::<B>))
        .route("/debug/db", get(routes::debug_db_handler::<B>))
        .route(
            "/conversaciones",
            get(routes::list_conversations_handler::<B>),
        )
        .route(
            "/conversaciones/{id}/mensajes",
            get(routes::list_messages_handler::<B>),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve<B>(state: Arc<ServerState<B>>, addr: SocketAddr) -> Result<(), ServerError>
where
    B: LlmBackend + 'static,
{
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "HTTP server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
