//! The event loop that owns a sync session.
//!
//! Inbound channel events, poll ticks, and operator commands all funnel
//! through one mpsc channel and are handled atomically to completion, one
//! at a time. The session and its transport binding are owned exclusively
//! by this loop; rebinding on connect and resetting session fields happen
//! inside a single handler, so an in-flight tick can never observe a
//! half-reconnected session.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::codec::{LeafKind, RawEdit};
use crate::origin::ChannelEvent;
use crate::path::Path;
use crate::poll::{POLL_INTERVAL, Poller};
use crate::session::SyncSession;
use crate::transport::Transport;

/// Everything that can wake the event loop.
pub enum Event {
    /// Inbound cross-context message.
    Channel(ChannelEvent),
    /// Poll timer fired for the given session generation.
    Tick { generation: u64 },
    /// Operator intent.
    Command(Command),
    /// Stop draining events and return.
    Shutdown,
}

pub enum Command {
    Connect { binding: Transport, url: String },
    Disconnect,
    Refresh,
    SetSubscribed(bool),
    StartEdit,
    EditLeaf { path: Path, kind: LeafKind, raw: RawEdit },
    SaveEdit,
    CancelEdit,
    HistoryBack,
    HistoryForward,
}

/// Cloneable handle for feeding a running inspector.
#[derive(Clone)]
pub struct InspectorHandle {
    events: UnboundedSender<Event>,
}

impl InspectorHandle {
    /// Deliver an inbound cross-context message.
    pub fn channel_event(&self, event: ChannelEvent) {
        let _ = self.events.send(Event::Channel(event));
    }

    pub fn command(&self, command: Command) {
        let _ = self.events.send(Event::Command(command));
    }

    pub fn shutdown(&self) {
        let _ = self.events.send(Event::Shutdown);
    }
}

pub struct Inspector {
    session: SyncSession,
    poller: Poller,
    events: UnboundedReceiver<Event>,
    on_change: Option<Box<dyn FnMut(&SyncSession) + Send>>,
}

impl Inspector {
    pub fn new() -> (Self, InspectorHandle) {
        Self::with_poll_interval(POLL_INTERVAL)
    }

    pub fn with_poll_interval(interval: Duration) -> (Self, InspectorHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inspector = Self {
            session: SyncSession::new(),
            poller: Poller::with_interval(tx.clone(), interval),
            events: rx,
            on_change: None,
        };
        (inspector, InspectorHandle { events: tx })
    }

    /// Register the view-refresh hook, invoked after every accepted
    /// snapshot change or local edit.
    pub fn on_change(&mut self, hook: impl FnMut(&SyncSession) + Send + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    /// Drain events until shutdown. Consumes the inspector; observable
    /// effects flow through the transport binding and the change hook.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            match event {
                Event::Shutdown => break,
                Event::Channel(event) => match self.session.handle_event(&event) {
                    Ok(true) => self.notify(),
                    Ok(false) => {}
                    Err(err) => {
                        warn!(target = "flipscope", error = %err, "dropping malformed state push");
                    }
                },
                Event::Tick { generation } => {
                    if self.session.poll_tick(generation) {
                        self.poller.arm(generation);
                    }
                }
                Event::Command(command) => self.handle_command(command),
            }
        }
        debug!(target = "flipscope", "event loop ended");
    }

    fn handle_command(&mut self, command: Command) {
        let result = match command {
            Command::Connect { binding, url } => {
                let generation = self.session.connect(binding, &url);
                self.poller.arm(generation);
                Ok(())
            }
            Command::Disconnect => {
                self.session.disconnect();
                Ok(())
            }
            Command::Refresh => self.session.refresh(),
            Command::SetSubscribed(on) => self.session.set_subscribed(on),
            Command::StartEdit => self.session.start_edit(),
            Command::EditLeaf { path, kind, raw } => self.session.edit_leaf(&path, kind, raw),
            Command::SaveEdit => self.session.save_edit().map(|generation| {
                self.poller.arm(generation);
            }),
            Command::CancelEdit => self.session.cancel_edit().map(|generation| {
                self.poller.arm(generation);
            }),
            Command::HistoryBack => self.session.history_back(),
            Command::HistoryForward => self.session.history_forward(),
        };
        match result {
            Ok(()) => self.notify(),
            Err(err) => warn!(target = "flipscope", error = %err, "command rejected"),
        }
    }

    fn notify(&mut self) {
        if let Some(hook) = &mut self.on_change {
            hook(&self.session);
        }
    }
}
