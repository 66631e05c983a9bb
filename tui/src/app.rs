//! Main Application
//!
//! The App owns the [`ChatSession`] and drives it from two sources:
//! - Terminal events (keyboard, mouse, resize)
//! - Backend results, delivered over an mpsc channel by spawned tasks
//!
//! Outbound calls never run on the UI task, so the screen keeps rendering
//! (including the `Thinking...` placeholder) while a request is in flight.
//!
//! # Layout
//!
//! ```text
//! ┌ header: title + selected model ───────────┐
//! │ conversation (bottom-anchored, scrolls)   │
//! ├ separator ────────────────────────────────┤
//! │ input                                     │
//! └ status bar ───────────────────────────────┘
//! ```

use std::io;
use std::sync::Arc;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use forwarder_core::{GenerateResponse, ModelList};

use crate::backend::{ChatBackend, ClientError};
use crate::config::ClientConfig;
use crate::display::conversation_lines;
use crate::session::ChatSession;
use crate::theme;
use crate::widgets::{ConversationView, ConversationViewState};

/// Input box height (lines) including the separator
const INPUT_HEIGHT: u16 = 4;

/// Lines moved per mouse wheel notch
const WHEEL_STEP: usize = 3;

/// Results reported back by backend tasks
#[derive(Debug)]
pub enum BackendEvent {
    /// Startup model listing finished
    Models(Result<ModelList, ClientError>),
    /// A generate request finished
    Generated(Result<GenerateResponse, ClientError>),
}

/// Main application state
pub struct App<B: ChatBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Chat state machine
    session: ChatSession,

    // === Backend ===
    backend: Arc<B>,
    events_tx: mpsc::UnboundedSender<BackendEvent>,
    events_rx: mpsc::UnboundedReceiver<BackendEvent>,

    // === View State ===
    view: ConversationViewState,
    /// Session revision the view was last synced to
    seen_revision: u64,
}

impl<B: ChatBackend> App<B> {
    /// Create a new App instance
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = ChatSession::new(config.default_model.clone());
        let seen_revision = session.revision();

        Self {
            running: true,
            session,
            backend: Arc::new(backend),
            events_tx,
            events_rx,
            view: ConversationViewState::default(),
            seen_revision,
        }
    }

    // === Accessors ===

    /// Chat state
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Conversation scroll state
    pub fn view(&self) -> &ConversationViewState {
        &self.view
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    // === Backend ===

    /// Issue the one startup model listing
    pub fn start(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_models().await;
            // Receiver only goes away when the app is shutting down
            let _ = tx.send(BackendEvent::Models(result));
        });
    }

    fn submit(&mut self) {
        let Some(request) = self.session.submit() else {
            return;
        };
        tracing::info!(model = %request.model, "Submitting prompt");

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.generate(&request).await;
            let _ = tx.send(BackendEvent::Generated(result));
        });
    }

    /// Apply a finished backend call to the session
    pub fn apply_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Models(result) => self.session.apply_models(result),
            BackendEvent::Generated(result) => self.session.apply_generate(result),
        }
        self.sync_scroll();
    }

    /// Wait for the next backend result and apply it
    ///
    /// Returns `false` if no more results can arrive.
    pub async fn process_next_backend_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_backend_event(event);
                true
            }
            None => false,
        }
    }

    /// Jump to the newest entry whenever the message list or loading flag changed
    fn sync_scroll(&mut self) {
        if self.session.revision() != self.seen_revision {
            self.seen_revision = self.session.revision();
            self.view.scroll_to_bottom();
        }
    }

    // === Input ===

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if ctrl => self.running = false,

            // Submit message
            KeyCode::Enter => self.submit(),

            // Typing
            KeyCode::Char(c) if !ctrl => self.session.push_char(c),
            KeyCode::Backspace => self.session.pop_char(),

            // Model selection
            KeyCode::Tab => self.session.select_next_model(),
            KeyCode::BackTab => self.session.select_previous_model(),

            // Conversation scrolling
            KeyCode::PageUp => self.view.scroll_up(self.page_size()),
            KeyCode::PageDown => self.view.scroll_down(self.page_size()),
            KeyCode::Home if ctrl => self.view.scroll_up(usize::MAX),
            KeyCode::End if ctrl => self.view.scroll_to_bottom(),

            _ => {}
        }

        self.sync_scroll();
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.view.scroll_up(WHEEL_STEP),
            MouseEventKind::ScrollDown => self.view.scroll_down(WHEEL_STEP),
            _ => {}
        }
    }

    fn page_size(&self) -> usize {
        (self.view.viewport_height / 2).max(1)
    }

    // === Main loop ===

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.start();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => {
                            tracing::error!(error = %e, "Terminal event error");
                            return Err(e.into());
                        }
                        None => self.running = false,
                    }
                }

                Some(event) = self.events_rx.recv() => {
                    self.apply_backend_event(event);
                }
            }

            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Resize needs nothing beyond the redraw that follows
            _ => {}
        }
    }

    // === Rendering ===

    /// Render the whole screen
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let [header, conversation, input, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        self.render_conversation(frame, conversation);
        self.render_input(frame, input);
        self.render_status(frame, status);
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![
            Span::styled(" Ollama Chat", theme::banner_title()),
            Span::styled("  model: ", Style::default().fg(theme::DIM_GRAY)),
            Span::styled(
                self.session.selected_model().to_string(),
                Style::default().fg(theme::ACCENT_MAGENTA),
            ),
        ];
        if self.session.available_models().len() > 1 {
            spans.push(Span::styled(
                "  (Tab to switch)",
                Style::default().fg(theme::DIM_GRAY),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_conversation(&mut self, frame: &mut Frame<'_>, area: Rect) {
        // One column of right margin
        let width = area.width.saturating_sub(1) as usize;
        let lines = conversation_lines(&self.session, width);
        frame.render_stateful_widget(ConversationView::new(&lines), area, &mut self.view);
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.height == 0 {
            return;
        }

        let buf = frame.buffer_mut();
        let separator = "-".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &separator, Style::default().fg(theme::DIM_GRAY));

        let text_height = area.height.saturating_sub(1) as usize;
        let text_width = area.width.saturating_sub(1) as usize;
        if text_width < 5 || text_height < 1 {
            return;
        }

        let (full_input, style) = if self.session.input_enabled() {
            (
                format!("You: {}_", self.session.input()),
                Style::default().fg(theme::USER_GREEN),
            )
        } else {
            (
                "Waiting for the model...".to_string(),
                Style::default().fg(theme::DIM_GRAY),
            )
        };

        let wrapped = textwrap::wrap(&full_input, text_width);
        let skip = wrapped.len().saturating_sub(text_height);
        for (i, line) in wrapped.iter().skip(skip).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + 1 + i as u16;
            buf.set_string(area.x, y, line, style);
        }

        if skip > 0 {
            buf.set_string(
                area.x + area.width.saturating_sub(3),
                area.y,
                "^",
                Style::default().fg(theme::INDICATOR_YELLOW),
            );
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let scroll_info = if self.view.is_at_bottom() {
            String::new()
        } else {
            format!(" [^{} lines - PgDn to scroll]", self.view.scroll_offset)
        };

        let status = format!(
            " Enter send | Tab model | PgUp/PgDn scroll | Esc quit{scroll_info}"
        );
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(theme::DIM_GRAY)),
            area,
        );
    }
}
