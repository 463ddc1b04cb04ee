//! Cached view of the session for the interactive loop.
//!
//! The event loop owns the session; the loop's change hook copies what the
//! prompt needs into this shared cache.

use std::sync::{Arc, Mutex};

use flipscope::{AppState, ConnectionMode, SyncSession, render_text};

#[derive(Clone, Default)]
pub struct SharedView(Arc<Mutex<ViewState>>);

#[derive(Default)]
struct ViewState {
    mode: ConnectionMode,
    url: String,
    editing: bool,
    state: Option<AppState>,
}

impl SharedView {
    pub fn update(&self, session: &SyncSession) {
        let mut view = self.lock();
        view.mode = session.mode();
        view.url = session.target_url().to_string();
        view.editing = session.editing();
        view.state = session.last_state().cloned();
    }

    pub fn state(&self) -> Option<AppState> {
        self.lock().state.clone()
    }

    pub fn editing(&self) -> bool {
        self.lock().editing
    }

    /// Status line plus the rendered tree, as printed by `show`.
    pub fn render(&self) -> String {
        let view = self.lock();
        let mode = match view.mode {
            ConnectionMode::Disconnected => "disconnected",
            ConnectionMode::Frame => "iframe",
            ConnectionMode::Window => "window",
        };
        let marker = if view.editing { " (editing)" } else { "" };
        let mut out = format!("[{mode}] {}{marker}\n", view.url);
        match &view.state {
            Some(state) => out.push_str(&render_text(state)),
            None => out.push_str("<no snapshot>\n"),
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
