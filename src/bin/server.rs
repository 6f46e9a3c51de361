//! master-agent HTTP server binary.
//!
//! Starts an axum HTTP server that fronts the Gemini API with the master
//! agent's delegation classifier.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` — Gemini API key (required; `GOOGLE_API_KEY` also accepted)
//! - `GEMINI_MODEL` — Model name (default: gemini-2.0-flash-exp)
//! - `HOST` / `PORT` — Bind address (default: 0.0.0.0:8080)
//! - `CHILD_AGENTS_FILE` — Optional YAML with extra child agents
//! - `RUST_LOG` — Tracing filter (default: "info,master_agent=debug")
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;
use master_agent::capabilities::DescriptorRegistry;
use master_agent::llms::GeminiCompletion;
use master_agent::meta_agents::PromptOrchestrator;
use master_agent::server::{app_router, AppState};
use master_agent::utilities::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,master_agent=debug".into()),
        )
        .init();

    let settings = Settings::from_env()?;

    let gemini = GeminiCompletion::new(settings.model.clone(), Some(settings.api_key.clone()))
        .with_base_url(settings.base_url.clone())
        .with_timeout(settings.timeout);

    let registry = DescriptorRegistry::with_defaults();
    if let Some(path) = &settings.child_agents_file {
        registry
            .load_file(path)
            .with_context(|| format!("loading child agents from {}", path.display()))?;
    }

    let orchestrator = PromptOrchestrator::new(Arc::new(gemini), Arc::new(registry));
    tracing::info!(
        "Master agent ready: model={}, child agents={}",
        orchestrator.model(),
        orchestrator.child_agents().len()
    );

    let app = app_router(AppState::new(orchestrator));
    let bind_addr = settings.bind_addr();

    tracing::info!("master-agent server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  POST /processAgentRequest — orchestrate a task");
    tracing::info!("  POST /chat                — chat shortcut");
    tracing::info!("  GET  /getAgentInfo        — agent description");
    tracing::info!("  POST /registerChildAgent  — add a child agent");
    tracing::info!("  GET  /health              — liveness probe");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
