//! Theme and Colors
//!
//! A small palette for the chat view: one color per speaker, plus accents
//! for the header, status line, and system notices.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Speakers
// ============================================================================

/// User messages and the input line
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Model replies
pub const ASSISTANT_BLUE: Color = Color::Rgb(150, 180, 255);

/// Connection and generation errors
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

// ============================================================================
// UI Colors
// ============================================================================

/// Header title and selected model
pub const ACCENT_MAGENTA: Color = Color::Magenta;

/// Placeholder text, separators, status bar
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Faded lines at the edge of a scrolled view
pub const FADE_GRAY: Color = Color::Rgb(80, 80, 80);

/// Scroll indicator
pub const INDICATOR_YELLOW: Color = Color::Yellow;

/// Style for the welcome banner title
pub fn banner_title() -> Style {
    Style::default()
        .fg(ACCENT_MAGENTA)
        .add_modifier(Modifier::BOLD)
}

/// Style for the "Thinking..." placeholder
pub fn thinking() -> Style {
    Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC)
}
