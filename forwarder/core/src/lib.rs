//! Forwarder Core - Stateless HTTP relay between chat surfaces and Ollama
//!
//! This crate provides everything the forwarder daemon needs, independent of
//! how the process is launched:
//!
//! ```text
//! ┌──────────────┐   POST /api/generate   ┌─────────────┐   POST /api/generate   ┌──────────┐
//! │ Chat surface │ ─────────────────────▶ │  Forwarder  │ ─────────────────────▶ │  Ollama  │
//! │ (TUI, web)   │ ◀───────────────────── │  (router)   │ ◀───────────────────── │          │
//! └──────────────┘    GET /api/tags       └─────────────┘    GET /api/tags       └──────────┘
//! ```
//!
//! Each route makes exactly one upstream call and relays the upstream body
//! untouched. Any upstream failure collapses into a fixed `{"error": ...}`
//! payload with HTTP 500.
//!
//! # Module Overview
//!
//! - [`config`]: Layered configuration (defaults, TOML file, environment)
//! - [`error`]: Error types for startup and serving
//! - [`messages`]: Wire types shared with chat surfaces
//! - [`routes`]: The axum router and its two handlers
//! - [`server`]: Listener setup and graceful shutdown
//! - [`upstream`]: HTTP client for the model server

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod messages;
pub mod routes;
pub mod server;
pub mod upstream;

pub use config::{ForwarderConfig, ServerConfig, UpstreamConfig};
pub use error::ForwarderError;
pub use messages::{ErrorBody, GenerateRequest, GenerateResponse, ModelDescriptor, ModelList};
pub use routes::{build_router, AppState};
pub use server::ForwarderServer;
pub use upstream::{ModelServer, UpstreamClient, UpstreamError};
