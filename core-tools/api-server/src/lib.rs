//! API Server
//!
//! Thin HTTP boundary in front of the reasoning engine. Validates incoming
//! JSON, forwards it through the [`AgentHandle`] seam, and translates
//! failures into the wire contract. It holds no memory of its own: callers
//! supply their full memory set on every request and receive the updated
//! set back.
//!
//! # Endpoints
//!
//! - POST /api/agent - Process one directive against caller-supplied memory
//! - GET /api/status - Get server status
//!
//! # Error contract
//!
//! - 400 `{"error": "Message is required."}` when the message is empty after
//!   trimming (the engine is never invoked)
//! - 500 `{"error": "Agent execution failed."}` on any unexpected internal
//!   failure, with detail logged server-side only

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use sdk::agent::AgentHandle;
use sdk::errors::EngineError;
use sdk::types::{AgentMessage, MemoryEntry};

/// API server state shared across handlers
#[derive(Clone)]
pub struct ServerState {
    agent: Arc<dyn AgentHandle>,
}

impl ServerState {
    /// Create server state around an engine handle
    pub fn new(agent: Arc<dyn AgentHandle>) -> Self {
        Self { agent }
    }
}

/// Request body for POST /api/agent
#[derive(Debug, Deserialize)]
struct AgentRequest {
    /// The directive text
    #[serde(default)]
    message: String,

    /// Caller-held memory; anything that is not an array is treated as empty
    #[serde(default, deserialize_with = "memory_or_empty")]
    memory: Vec<MemoryEntry>,
}

/// Success body for POST /api/agent
#[derive(Debug, Serialize)]
struct AgentResponse {
    reply: AgentMessage,
    #[serde(rename = "updatedMemory")]
    updated_memory: Vec<MemoryEntry>,
}

/// Deserialize `memory` leniently: a missing or non-array value becomes an
/// empty set, and array elements that are not memory objects are skipped.
fn memory_or_empty<'de, D>(deserializer: D) -> Result<Vec<MemoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Build the API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/agent", post(agent_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind on the given address and serve until the returned sender fires.
///
/// Returns the bound address (useful with port 0) and the graceful-shutdown
/// handle.
pub async fn serve(
    bind: SocketAddr,
    agent: Arc<dyn AgentHandle>,
) -> Result<(SocketAddr, tokio::sync::oneshot::Sender<()>), EngineError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| EngineError::Network(format!("Failed to bind {bind}: {e}")))?;

    let addr = listener
        .local_addr()
        .map_err(|e| EngineError::Network(format!("Failed to get local address: {e}")))?;

    let app = router(ServerState::new(agent));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        tracing::info!("API server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_rx.await.ok();
                tracing::info!("API server shutting down gracefully");
            })
            .await
            .unwrap_or_else(|e| {
                tracing::error!("API server error: {}", e);
            });
    });

    Ok((addr, shutdown_tx))
}

/// Process one directive (POST /api/agent)
async fn agent_handler(
    State(state): State<ServerState>,
    Json(payload): Json<AgentRequest>,
) -> Response {
    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message is required."})),
        )
            .into_response();
    }

    // The engine contract is total, so an escaped panic is the only failure
    // mode left to translate into the 500 contract.
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        state.agent.process(&message, payload.memory, Utc::now())
    }));

    match outcome {
        Ok((reply, updated_memory)) => Json(AgentResponse {
            reply,
            updated_memory,
        })
        .into_response(),
        Err(_) => {
            tracing::error!("Agent execution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Agent execution failed."})),
            )
                .into_response()
        }
    }
}

/// Server status API endpoint
async fn status_handler(State(_state): State<ServerState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{DateTime, Utc};
    use sdk::types::Role;
    use tower::ServiceExt;

    /// Deterministic stand-in for the engine: echoes the directive and
    /// appends one entry to memory.
    struct EchoAgent;

    impl AgentHandle for EchoAgent {
        fn process(
            &self,
            directive: &str,
            mut memory: Vec<MemoryEntry>,
            now: DateTime<Utc>,
        ) -> (AgentMessage, Vec<MemoryEntry>) {
            memory.push(MemoryEntry::new("echo", directive, vec![], now, 0.5));
            let reply = AgentMessage {
                id: "reply-echo".to_string(),
                role: Role::Agent,
                content: directive.to_string(),
                plan: None,
                analysis: None,
                actions: None,
                reflections: None,
            };
            (reply, memory)
        }
    }

    /// Agent that always panics, for the 500 contract.
    struct FaultyAgent;

    impl AgentHandle for FaultyAgent {
        fn process(
            &self,
            _directive: &str,
            _memory: Vec<MemoryEntry>,
            _now: DateTime<Utc>,
        ) -> (AgentMessage, Vec<MemoryEntry>) {
            panic!("internal fault");
        }
    }

    fn app(agent: Arc<dyn AgentHandle>) -> Router {
        router(ServerState::new(agent))
    }

    async fn post_agent(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/agent")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_before_the_engine_runs() {
        // FaultyAgent would panic if invoked; 400 proves it never is
        let (status, body) = post_agent(app(Arc::new(FaultyAgent)), r#"{"message": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required.");
    }

    #[tokio::test]
    async fn test_missing_message_is_rejected() {
        let (status, body) = post_agent(app(Arc::new(FaultyAgent)), r#"{}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required.");
    }

    #[tokio::test]
    async fn test_success_response_shape() {
        let (status, body) = post_agent(
            app(Arc::new(EchoAgent)),
            r#"{"message": "Launch a product", "memory": []}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"]["role"], "agent");
        assert_eq!(body["reply"]["content"], "Launch a product");
        assert_eq!(body["updatedMemory"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_array_memory_is_treated_as_empty() {
        let (status, body) = post_agent(
            app(Arc::new(EchoAgent)),
            r#"{"message": "Launch", "memory": {"not": "an array"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        // EchoAgent appends exactly one entry to whatever it was given
        assert_eq!(body["updatedMemory"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_internal_failure_maps_to_generic_500() {
        let (status, body) =
            post_agent(app(Arc::new(FaultyAgent)), r#"{"message": "Launch"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Agent execution failed.");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let response = app(Arc::new(EchoAgent))
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "running");
    }
}
