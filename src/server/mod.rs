//! HTTP server for the master agent.
//!
//! Exposes the orchestrator to browsers and other services.
//!
//! # Endpoints
//!
//! - `POST /processAgentRequest` — Orchestrate a task
//! - `POST /chat`                — Chat shortcut
//! - `GET  /getAgentInfo`        — Agent description
//! - `POST /registerChildAgent`  — Runtime child agent registration
//! - `GET  /health`              — Liveness probe

pub mod routes;

pub use routes::{app_router, AppState};
