//! Axum route handlers for the master agent HTTP server.
//!
//! # Routes
//!
//! - `POST /processAgentRequest` — Run a `TaskRequest` through the orchestrator
//! - `POST /chat`                — Conversational shortcut (`taskType = "chat"`)
//! - `GET  /getAgentInfo`        — Describe the master agent and its child agents
//! - `POST /registerChildAgent`  — Add or replace a child agent descriptor
//! - `GET  /health`              — Liveness probe
//!
//! Every response carries permissive CORS headers; `OPTIONS` preflights are
//! answered by the CORS layer. Wrong methods get a JSON 405.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::capabilities::CapabilityDescriptor;
use crate::meta_agents::{
    ConversationTurn, OrchestrationResult, PromptOrchestrator, TaskContext, TaskRequest,
    ORCHESTRATOR_NAME,
};

/// Version reported by `/getAgentInfo`.
pub const AGENT_VERSION: &str = "1.0.0";

/// Capabilities advertised by `/getAgentInfo`.
pub const AGENT_CAPABILITIES: [&str; 4] = [
    "Task orchestration",
    "Multi-agent coordination",
    "Context management",
    "Dynamic task delegation",
];

type ApiError = (StatusCode, Json<Value>);

/// Shared application state for the HTTP server.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The master agent shared by all requests.
    pub orchestrator: Arc<PromptOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: PromptOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler).fallback(method_not_allowed))
        .route(
            "/processAgentRequest",
            post(process_agent_request_handler).fallback(method_not_allowed),
        )
        .route("/chat", post(chat_handler).fallback(method_not_allowed))
        .route(
            "/getAgentInfo",
            get(agent_info_handler).fallback(method_not_allowed),
        )
        .route(
            "/registerChildAgent",
            post(register_child_agent_handler).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "master-agent",
    }))
}

/// POST /processAgentRequest — orchestrate a task.
///
/// Request:  `TaskRequest` = `{ "taskType", "parameters", "context"? }`
/// Response: `OrchestrationResult`, 200 on success and 500 on failure.
async fn process_agent_request_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<OrchestrationResult>), ApiError> {
    const INVALID: &str = "Invalid request. taskType and parameters are required.";

    let Json(body) = payload.map_err(|e| {
        tracing::debug!("Rejected processAgentRequest body: {}", e);
        bad_request(INVALID)
    })?;

    let has_task_type = body
        .get("taskType")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());
    let has_parameters = body.get("parameters").is_some_and(Value::is_object);
    if !has_task_type || !has_parameters {
        return Err(bad_request(INVALID));
    }

    let request: TaskRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(format!("Invalid request: {}", e)))?;

    let result = run_task(&state, request).await;
    let status = if result.succeeded {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)))
}

/// Chat request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody {
    message: Option<String>,
    session_id: Option<String>,
    conversation_history: Option<Vec<ConversationTurn>>,
}

/// POST /chat — conversational shortcut.
///
/// Request: `{ "message", "sessionId"?, "conversationHistory"? }`. The
/// result is always returned with 200, even when the model call failed.
async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<OrchestrationResult>, ApiError> {
    let Json(body) = payload.map_err(|e| bad_request(e.body_text()))?;
    let request = chat_task(body)?;
    Ok(Json(run_task(&state, request).await))
}

/// Turn a chat body into a `chat` task. Blank session ids get a fresh one.
fn chat_task(body: ChatBody) -> Result<TaskRequest, ApiError> {
    let message = body
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| bad_request("Message is required"))?;

    let mut parameters = Map::new();
    parameters.insert("message".to_string(), Value::String(message));

    let mut context = TaskContext::new(
        body.session_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("session_{}", chrono::Utc::now().timestamp_millis())),
    );
    context.conversation_history = body.conversation_history.unwrap_or_default();

    Ok(TaskRequest::new("chat", parameters).with_context(context))
}

async fn run_task(state: &AppState, request: TaskRequest) -> OrchestrationResult {
    let span = tracing::info_span!(
        "task",
        request_id = %Uuid::new_v4(),
        task_type = %request.kind,
    );

    async move {
        tracing::info!("Processing task");
        let result = state.orchestrator.handle(request).await;
        match (&result.error, result.delegated_to()) {
            (Some(error), _) => tracing::error!("Task failed: {}", error),
            (None, Some(target)) => tracing::info!("Task delegated to {}", target),
            (None, None) => tracing::info!("Task handled by {}", ORCHESTRATOR_NAME),
        }
        result
    }
    .instrument(span)
    .await
}

/// GET /getAgentInfo — describe the master agent.
async fn agent_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": ORCHESTRATOR_NAME,
        "version": AGENT_VERSION,
        "model": state.orchestrator.model(),
        "childAgents": state.orchestrator.child_agents(),
        "capabilities": AGENT_CAPABILITIES,
    }))
}

/// POST /registerChildAgent — add or replace a child agent.
///
/// Request body: `CapabilityDescriptor`
async fn register_child_agent_handler(
    State(state): State<AppState>,
    payload: Result<Json<CapabilityDescriptor>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(descriptor) = payload.map_err(|e| bad_request(e.body_text()))?;
    let name = descriptor.name.clone();

    state
        .orchestrator
        .register_child_agent(descriptor)
        .map_err(|e| bad_request(e.to_string()))?;

    tracing::info!("Registered child agent {}", name);
    Ok(Json(json!({
        "status": "registered",
        "name": name,
    })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
