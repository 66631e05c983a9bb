//! Conversation View
//!
//! A borderless, scrollable region anchored to the bottom: offset 0 shows
//! the newest lines, larger offsets reveal older ones. When content is
//! hidden above or below, the edge rows are dimmed as a hint.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;

use crate::display::DisplayLine;
use crate::theme::FADE_GRAY;

/// State for the conversation view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationViewState {
    /// Scroll offset (lines from bottom, 0 = latest)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
    /// Visible rows at the last render
    pub viewport_height: usize,
}

impl ConversationViewState {
    /// Reveal older lines
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_offset());
    }

    /// Move toward the newest lines
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the newest lines
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Whether the newest line is visible
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset == 0
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height.max(1))
    }
}

/// Bottom-anchored list of pre-wrapped lines
pub struct ConversationView<'a> {
    lines: &'a [DisplayLine],
}

impl<'a> ConversationView<'a> {
    /// Render `lines`, which must already be wrapped to the target width
    pub fn new(lines: &'a [DisplayLine]) -> Self {
        Self { lines }
    }
}

impl StatefulWidget for ConversationView<'_> {
    type State = ConversationViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let height = area.height as usize;
        state.total_lines = self.lines.len();
        state.viewport_height = height;

        // Clamp scroll
        state.scroll_offset = state.scroll_offset.min(state.max_offset());

        if height == 0 || area.width == 0 {
            return;
        }

        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let has_content_above = visible_start > 0;
        let has_content_below = state.scroll_offset > 0;

        // Short conversations sit at the top of the area
        for (i, line) in self.lines[visible_start..visible_end].iter().enumerate() {
            let faded = (has_content_above && i == 0)
                || (has_content_below && i + 1 == height);
            let style = if faded {
                Style::default().fg(FADE_GRAY)
            } else {
                line.style
            };

            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, &line.text, area.width as usize, style);
        }
    }
}
