//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (query pending, image uploading): draws every ~80ms so the
//!   busy dots move and the upload is promoted on time.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Queries
//!
//! `Effect::SendQuery` is run on a tokio task. A second task supervises it and
//! always sends exactly one `Action::QueryFinished` back over the channel, even
//! if the request task panics, so the busy state can never get stuck.

mod component;
mod components;
mod event;
pub mod format;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::client::{ClientError, HttpQueryClient, QueryBackend, QueryRequest};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{Composer, ComposerEvent, LoginEvent, LoginForm, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub login: LoginForm,
    pub composer: Composer,
    pub message_list: MessageListState,
}

impl TuiState {
    pub fn new(upload_delay: Duration) -> Self {
        Self {
            login: LoginForm::new(),
            composer: Composer::new(upload_delay),
            message_list: MessageListState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Build the query backend for a resolved config.
pub fn build_backend(config: &ResolvedConfig) -> Result<Arc<dyn QueryBackend>, ClientError> {
    let client = HttpQueryClient::new(config.endpoint.clone(), config.request_timeout)?;
    Ok(Arc::new(client))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Using {} backend at {}", backend.name(), config.endpoint);

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(config.upload_delay);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {e}");
    }

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if tui.composer.poll_upload(Instant::now()) {
            needs_redraw = true;
        }

        let animating = app.is_thinking || tui.composer.is_uploading();
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, &event) {
                should_quit |= dispatch(&mut app, action, &backend, &tx);
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (query results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit |= dispatch(&mut app, action, &backend, &tx);
        }

        if should_quit {
            break;
        }
    }

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("Smokeland shutting down");
    Ok(())
}

/// Turns a terminal event into a core action, letting the focused component
/// handle everything else locally.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        // Resize just needs a redraw (already flagged by the caller)
        TuiEvent::Resize => None,
        // ForceQuit (Ctrl+C) always quits regardless of screen
        TuiEvent::ForceQuit => Some(Action::Quit),
        _ if !app.session.is_logged_in() => match tui.login.handle_event(event)? {
            LoginEvent::Submit => {
                info!("Login submitted for {}", tui.login.email());
                Some(Action::Login)
            }
        },
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            None
        }
        _ => {
            tui.composer.disabled = app.is_thinking;
            match tui.composer.handle_event(event)? {
                ComposerEvent::Submit { text, image } => {
                    // Your own message always scrolls into view
                    tui.message_list.stick_to_bottom = true;
                    Some(Action::Submit { text, image })
                }
            }
        }
    }
}

/// Applies an action and performs the resulting effect. Returns `true` to quit.
fn dispatch(
    app: &mut App,
    action: Action,
    backend: &Arc<dyn QueryBackend>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SendQuery(request) => {
            spawn_query(Arc::clone(backend), request, tx.clone());
            false
        }
    }
}

/// Runs `request` on a background task and reports the outcome as
/// `Action::QueryFinished`. The report is sent exactly once, including when
/// the request task panics or is cancelled.
pub(crate) fn spawn_query(
    backend: Arc<dyn QueryBackend>,
    request: QueryRequest,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Spawning query (text_len={}, image={})",
        request.query.len(),
        request.image.is_some()
    );

    let worker = tokio::spawn(async move { backend.query(request).await });

    tokio::spawn(async move {
        let result = match worker.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Query task ended abnormally: {e}");
                Err(ClientError::Network(format!("request task failed: {e}")))
            }
        };
        if tx.send(Action::QueryFinished(result)).is_err() {
            warn!("Failed to send QueryFinished: receiver dropped");
        }
    })
}
