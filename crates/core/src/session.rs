//! The protocol state machine.
//!
//! A `SyncSession` is created once at startup and re-pointed, never
//! recreated, on each connect. It owns the single live transport binding
//! and the last known snapshot; the event loop drives it one event at a
//! time, so nothing here needs locking.

use tracing::debug;

use flipscope_protocol::{Inbound, Outbound, parse_inbound};

use crate::codec::{self, LeafKind, RawEdit};
use crate::error::{Error, Result};
use crate::origin::{self, ChannelEvent};
use crate::path::Path;
use crate::state::AppState;
use crate::transport::Transport;

/// How the controller currently reaches the target context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    #[default]
    Disconnected,
    Frame,
    Window,
}

impl ConnectionMode {
    fn of(transport: &Transport) -> Self {
        match transport {
            Transport::Disconnected => ConnectionMode::Disconnected,
            Transport::Frame(_) => ConnectionMode::Frame,
            Transport::Window(_) => ConnectionMode::Window,
        }
    }
}

pub struct SyncSession {
    mode: ConnectionMode,
    target_url: String,
    last_state: Option<AppState>,
    subscribed: bool,
    editing: bool,
    transport: Transport,
    /// Identity of the current poll chain. Bumped whenever outstanding
    /// timers must go stale: connect, disconnect, and every edit-mode
    /// transition.
    generation: u64,
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            mode: ConnectionMode::Disconnected,
            target_url: String::new(),
            last_state: None,
            subscribed: false,
            editing: false,
            transport: Transport::Disconnected,
            generation: 0,
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn last_state(&self) -> Option<&AppState> {
        self.last_state.as_ref()
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn connected(&self) -> bool {
        self.mode != ConnectionMode::Disconnected
    }

    /// Re-point the session at a target. Tears down the existing binding
    /// (closing an owned window handle), resets session fields, requests a
    /// snapshot and a one-shot subscription, and invalidates outstanding
    /// poll timers. Returns the generation a fresh poll chain should carry.
    pub fn connect(&mut self, binding: Transport, url: &str) -> u64 {
        let mode = ConnectionMode::of(&binding);
        debug!(target = "flipscope.session", url, ?mode, "connecting");
        self.transport.rebind(binding);
        self.mode = mode;
        self.target_url = url.to_string();
        self.last_state = None;
        self.subscribed = false;
        self.editing = false;
        self.generation += 1;
        self.transport.send(Outbound::GetState);
        self.transport.send(Outbound::SubscribeStateUpdate);
        self.subscribed = true;
        self.generation
    }

    /// Drop the binding and return to the disconnected state.
    pub fn disconnect(&mut self) {
        debug!(target = "flipscope.session", "disconnecting");
        self.transport.rebind(Transport::Disconnected);
        self.mode = ConnectionMode::Disconnected;
        self.subscribed = false;
        self.editing = false;
        self.generation += 1;
    }

    /// Handle one inbound channel event. Returns whether the snapshot
    /// changed. Screening rejections and unrecognized message types are
    /// silent; a malformed state payload in an accepted push is an error
    /// the caller surfaces for that message.
    pub fn handle_event(&mut self, event: &ChannelEvent) -> Result<bool> {
        let Some(data) = origin::screen(event, &self.target_url, self.editing) else {
            return Ok(false);
        };
        let Some(message) = parse_inbound(data) else {
            debug!(target = "flipscope.session", "unrecognized message type; ignoring");
            return Ok(false);
        };
        match message {
            Inbound::ApplicationState { state, location } => {
                let parsed = AppState::parse(&state)?;
                self.last_state = Some(parsed);
                self.target_url = location;
                // The subscription is one-shot; renew it after every push.
                if self.subscribed {
                    self.transport.send(Outbound::SubscribeStateUpdate);
                }
                Ok(true)
            }
        }
    }

    /// Enter edit mode. Protocol-driven mutation of the snapshot and the
    /// poll chain are suspended until save or cancel.
    pub fn start_edit(&mut self) -> Result<()> {
        if !self.connected() {
            return Err(Error::InvalidTransition("not connected"));
        }
        if self.last_state.is_none() {
            return Err(Error::InvalidTransition("no snapshot to edit"));
        }
        self.editing = true;
        self.generation += 1;
        Ok(())
    }

    /// Apply one local leaf edit. Nothing is sent until save.
    pub fn edit_leaf(&mut self, path: &Path, kind: LeafKind, raw: RawEdit) -> Result<()> {
        if !self.editing {
            return Err(Error::InvalidTransition("not editing"));
        }
        let current = self
            .last_state
            .as_ref()
            .ok_or(Error::InvalidTransition("no snapshot to edit"))?;
        self.last_state = Some(codec::apply_edit(current, path, kind, raw)?);
        Ok(())
    }

    /// Push the edited snapshot to the target and leave edit mode. Returns
    /// the generation for the resumed poll chain.
    pub fn save_edit(&mut self) -> Result<u64> {
        if !self.editing {
            return Err(Error::InvalidTransition("not editing"));
        }
        let state = self
            .last_state
            .as_ref()
            .ok_or(Error::InvalidTransition("no snapshot to edit"))?;
        self.transport.send(Outbound::SetState {
            state: state.serialize(),
        });
        self.transport.send(Outbound::GetState);
        self.editing = false;
        self.generation += 1;
        Ok(self.generation)
    }

    /// Discard local edits and force a refresh. Returns the generation for
    /// the resumed poll chain.
    pub fn cancel_edit(&mut self) -> Result<u64> {
        if !self.editing {
            return Err(Error::InvalidTransition("not editing"));
        }
        self.transport.send(Outbound::GetState);
        self.editing = false;
        self.generation += 1;
        Ok(self.generation)
    }

    /// Request a fresh snapshot.
    pub fn refresh(&self) -> Result<()> {
        self.require_idle()?;
        self.transport.send(Outbound::GetState);
        Ok(())
    }

    /// Toggle push subscription. Turning it on requests a snapshot and a
    /// fresh one-shot subscription immediately.
    pub fn set_subscribed(&mut self, on: bool) -> Result<()> {
        self.require_idle()?;
        self.subscribed = on;
        if on {
            self.transport.send(Outbound::GetState);
            self.transport.send(Outbound::SubscribeStateUpdate);
        }
        Ok(())
    }

    /// Navigate the target's internal history back.
    pub fn history_back(&self) -> Result<()> {
        self.require_idle()?;
        self.transport.send(Outbound::MoveHistoryBackwards);
        Ok(())
    }

    /// Navigate the target's internal history forward.
    pub fn history_forward(&self) -> Result<()> {
        self.require_idle()?;
        self.transport.send(Outbound::MoveHistoryForwards);
        Ok(())
    }

    fn require_idle(&self) -> Result<()> {
        if !self.connected() {
            return Err(Error::InvalidTransition("not connected"));
        }
        if self.editing {
            return Err(Error::InvalidTransition("edit in progress"));
        }
        Ok(())
    }

    /// A poll timer fired. Sends a refresh only when the tick still belongs
    /// to the live chain and no edit is in progress; the return value says
    /// whether the cycle should re-arm.
    pub fn poll_tick(&self, generation: u64) -> bool {
        if generation != self.generation || !self.connected() || self.editing {
            return false;
        }
        self.transport.send(Outbound::GetState);
        true
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}
