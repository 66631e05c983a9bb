//! Display Lines
//!
//! Turns a [`ChatSession`] into the styled, width-wrapped lines the
//! conversation view renders. Kept separate from the widget so layout can
//! be checked without a terminal.
//!
//! - Empty session: the two-line welcome banner
//! - Otherwise: each message prefixed by its speaker, followed by a blank line
//! - While loading: a trailing `Thinking...` line

use ratatui::style::Style;

use crate::session::{ChatMessage, ChatSession, THINKING_TEXT};
use crate::theme;

/// Banner title shown before the first message
pub const WELCOME_TITLE: &str = "Welcome to Ollama Chat";

/// Banner subtitle shown before the first message
pub const WELCOME_SUBTITLE: &str = "Ask me anything and I'll respond using the selected model.";

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// User input
    User,
    /// Model reply
    Assistant,
    /// Error notice produced by the client itself
    System,
}

impl DisplayRole {
    /// Classify a session message
    pub fn of(message: &ChatMessage) -> Self {
        if message.is_user {
            Self::User
        } else if message.is_notice {
            Self::System
        } else {
            Self::Assistant
        }
    }

    /// Get the prefix for this role
    pub fn prefix(self) -> &'static str {
        match self {
            DisplayRole::User => "You: ",
            DisplayRole::Assistant => "Ollama: ",
            DisplayRole::System => "",
        }
    }

    /// Base style for this role
    pub fn style(self) -> Style {
        match self {
            DisplayRole::User => Style::default().fg(theme::USER_GREEN),
            DisplayRole::Assistant => Style::default().fg(theme::ASSISTANT_BLUE),
            DisplayRole::System => Style::default().fg(theme::ERROR_RED),
        }
    }
}

/// One wrapped, styled row of the conversation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    /// Row text, already fitted to the target width
    pub text: String,
    /// Row style
    pub style: Style,
}

impl DisplayLine {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), Style::default())
    }
}

/// Build the conversation rows for a view `width` columns wide
pub fn conversation_lines(session: &ChatSession, width: usize) -> Vec<DisplayLine> {
    let width = width.max(1);
    let mut lines = Vec::new();

    if session.messages().is_empty() {
        push_wrapped(&mut lines, WELCOME_TITLE, width, theme::banner_title());
        lines.push(DisplayLine::blank());
        push_wrapped(
            &mut lines,
            WELCOME_SUBTITLE,
            width,
            Style::default().fg(theme::DIM_GRAY),
        );
    }

    for message in session.messages() {
        let role = DisplayRole::of(message);
        let content = format!("{}{}", role.prefix(), message.text);
        push_wrapped(&mut lines, &content, width, role.style());
        lines.push(DisplayLine::blank());
    }

    if session.is_loading() {
        if session.messages().is_empty() {
            lines.push(DisplayLine::blank());
        }
        push_wrapped(&mut lines, THINKING_TEXT, width, theme::thinking());
    }

    lines
}

/// Wrap `content` (which may contain newlines) into display lines
fn push_wrapped(lines: &mut Vec<DisplayLine>, content: &str, width: usize, style: Style) {
    for paragraph in content.split('\n') {
        if paragraph.is_empty() {
            lines.push(DisplayLine::new(String::new(), style));
            continue;
        }
        for row in textwrap::wrap(paragraph, width) {
            lines.push(DisplayLine::new(row.into_owned(), style));
        }
    }
}
