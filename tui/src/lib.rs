//! Ollama Chat TUI - Terminal chat front-end for a local Ollama server
//!
//! Talks to Ollama exclusively through the forwarder daemon, one
//! non-streaming generate request per submitted prompt.
//!
//! # Architecture
//!
//! - **Session**: Pure chat state machine (messages, loading flag, model)
//! - **Backend**: HTTP client for the forwarder behind the `ChatBackend` trait
//! - **Display**: Turns session state into styled, wrapped lines
//! - **Widgets**: Bottom-anchored scrollable conversation view
//! - **App**: Event loop wiring keyboard, backend results, and rendering

pub mod app;
pub mod backend;
pub mod config;
pub mod display;
pub mod session;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use backend::{ChatBackend, ClientError, ForwarderClient};
pub use config::ClientConfig;
pub use session::ChatSession;
