//! HTTP ingress: REST, GraphQL and the topic producer endpoint.
//!
//! Routes:
//! - `POST /api/people`, `GET /api/people?name=`
//! - `GET | PUT | DELETE /api/people/{id}`
//! - `POST /graphql`
//! - `POST /api/topics/{topic}/messages`
//! - `GET /health`

pub mod graphql;
pub mod people;
pub mod topics;

use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::models::ServerConfig;
use crate::domain::ports::MessageLog;
use crate::services::PersonService;

pub use graphql::{build_schema, PersonSchema};

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

/// Shared state for all handlers.
pub struct AppState {
    /// Person operations behind REST and GraphQL.
    pub people: PersonService,
    /// Message log the producer endpoint appends to.
    pub log: Arc<dyn MessageLog>,
    /// GraphQL schema over `people`.
    pub schema: PersonSchema,
}

impl AppState {
    /// Build the state and the GraphQL schema over `people`.
    pub fn new(people: PersonService, log: Arc<dyn MessageLog>) -> Self {
        let schema = build_schema(people.clone());
        Self { people, log, schema }
    }
}

/// Build the full router. Exposed separately from [`HttpServer`] so it can be
/// driven without a socket.
pub fn build_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/api/people", post(people::create_person).get(people::find_person))
        .route(
            "/api/people/{id}",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route("/graphql", post(graphql::graphql_handler))
        .route("/api/topics/{topic}/messages", post(topics::publish_message))
        .route("/health", get(health_check))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

/// HTTP server bound to the configured address.
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Server for `state` on the host and port in `config`.
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self { config, state }
    }

    /// Bind a listener on the configured host and port. The host may be a
    /// hostname such as `localhost` or a bare IPv4/IPv6 address.
    pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
        TcpListener::bind((config.host.as_str(), config.port)).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = Self::bind(&self.config).await?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, host = %self.config.host, "HTTP server listening");

        let router = build_router(self.state, self.config.enable_cors);

        axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
