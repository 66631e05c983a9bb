//! Chat Session State
//!
//! The whole client-side state machine lives here, free of any terminal or
//! network code so it can be driven directly from tests.
//!
//! # State
//!
//! - `messages`: append-only, chronological
//! - `is_loading`: true from submission until the generate call settles
//! - `selected_model`: model used for the next submission
//!
//! # Flow
//!
//! ```text
//!   submit() ──▶ user message appended, input cleared, loading = true
//!      │
//!      └─▶ caller sends the returned GenerateRequest
//!              │
//!              ▼
//!   apply_generate(result) ──▶ reply or error appended, loading = false
//! ```

use forwarder_core::{GenerateRequest, GenerateResponse, ModelDescriptor, ModelList};

use crate::backend::ClientError;

/// Model used until the user picks another one
pub const DEFAULT_MODEL: &str = "llama2";

/// Shown when the startup model listing fails
pub const CONNECTION_ERROR_TEXT: &str =
    "Error connecting to Ollama. Make sure the server is running on localhost:11434";

/// Shown when a generate call fails for any reason
pub const GENERATE_ERROR_TEXT: &str =
    "Error generating response. Make sure Ollama is running correctly.";

/// Placeholder rendered after the last message while loading
pub const THINKING_TEXT: &str = "Thinking...";

/// Per-session message identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Numeric value (creation order)
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One chat turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique within the session, increasing with creation order
    pub id: MessageId,
    /// Message text as typed or as returned
    pub text: String,
    /// Typed by the user (as opposed to a model reply or system notice)
    pub is_user: bool,
    /// Error notice produced by the client itself rather than the model
    pub is_notice: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    User,
    Model,
    Notice,
}

/// Client session state
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    input: String,
    is_loading: bool,
    selected_model: String,
    available_models: Vec<ModelDescriptor>,
    next_id: u64,
    revision: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ChatSession {
    /// Create an empty session
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            selected_model: default_model.into(),
            available_models: Vec::new(),
            next_id: 0,
            revision: 0,
        }
    }

    // === Accessors ===

    /// Messages in append order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether a generate request is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the input control accepts edits and submissions
    pub fn input_enabled(&self) -> bool {
        !self.is_loading
    }

    /// Model for the next submission
    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// Models returned by the startup listing
    pub fn available_models(&self) -> &[ModelDescriptor] {
        &self.available_models
    }

    /// Bumped on every change to `messages` or `is_loading`
    ///
    /// The view compares this to decide when to jump to the newest entry.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // === Input editing ===

    /// Append a character to the input (ignored while loading)
    pub fn push_char(&mut self, c: char) {
        if self.input_enabled() {
            self.input.push(c);
        }
    }

    /// Remove the last input character (ignored while loading)
    pub fn pop_char(&mut self) {
        if self.input_enabled() {
            self.input.pop();
        }
    }

    /// Replace the input buffer (ignored while loading)
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.input_enabled() {
            self.input = text.into();
        }
    }

    // === Transitions ===

    /// Submit the current input
    ///
    /// Returns the request to send, or `None` when the input is blank or a
    /// request is already in flight. On `Some`, the user message has been
    /// appended, the input cleared, and loading set.
    pub fn submit(&mut self) -> Option<GenerateRequest> {
        if !self.input_enabled() || self.input.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.input);
        self.push_message(prompt.clone(), Origin::User);
        self.set_loading(true);

        Some(GenerateRequest::new(self.selected_model.clone(), prompt))
    }

    /// Record the outcome of a generate request and clear loading
    pub fn apply_generate(&mut self, result: Result<GenerateResponse, ClientError>) {
        match result {
            Ok(reply) => self.push_message(reply.response, Origin::Model),
            Err(e) => {
                tracing::error!(error = %e, "Error generating response");
                self.push_message(GENERATE_ERROR_TEXT.to_string(), Origin::Notice);
            }
        }
        self.set_loading(false);
    }

    /// Record the outcome of the startup model listing
    pub fn apply_models(&mut self, result: Result<ModelList, ClientError>) {
        match result {
            Ok(list) => {
                tracing::info!(count = list.models.len(), "Fetched available models");
                self.available_models = list.models;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching models");
                self.push_message(CONNECTION_ERROR_TEXT.to_string(), Origin::Notice);
            }
        }
    }

    // === Model selection ===

    /// Select a model by name
    pub fn select_model(&mut self, name: impl Into<String>) {
        self.selected_model = name.into();
    }

    /// Cycle forward through the available models
    pub fn select_next_model(&mut self) {
        let len = self.available_models.len();
        if len == 0 {
            return;
        }
        let next = match self.selected_index() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.selected_model
            .clone_from(&self.available_models[next].name);
    }

    /// Cycle backward through the available models
    pub fn select_previous_model(&mut self) {
        let len = self.available_models.len();
        if len == 0 {
            return;
        }
        let previous = match self.selected_index() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.selected_model
            .clone_from(&self.available_models[previous].name);
    }

    fn selected_index(&self) -> Option<usize> {
        self.available_models
            .iter()
            .position(|m| m.name == self.selected_model)
    }

    // === Internals ===

    fn push_message(&mut self, text: String, origin: Origin) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text,
            is_user: origin == Origin::User,
            is_notice: origin == Origin::Notice,
        });
        self.revision += 1;
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_loading != loading {
            self.is_loading = loading;
            self.revision += 1;
        }
    }
}
