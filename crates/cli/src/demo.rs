//! An in-process application context for driving the inspector without a
//! hosting browser.
//!
//! The demo target implements the target side of the contract: it answers
//! `get state`, honors one-shot subscriptions, applies `set state`, and
//! keeps a state history for the time-travel navigation messages. Its
//! channel is a plain mpsc pair; replies come back through the inspector
//! handle stamped with the target URL's origin.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use flipscope::origin::expected_origin;
use flipscope::{
    AppState, ChannelEvent, FrameHost, InspectorHandle, Result, TargetPort, Transport, WindowHandle,
};
use flipscope_protocol::{Outbound, PROTOCOL_TAG, has_protocol_tag};

use crate::route::RouteMode;

/// Spawn a demo target and return the binding the session should connect
/// with. The target task ends once the binding (and with it the sending
/// half of its channel) is dropped.
pub fn spawn(mode: RouteMode, url: &str, controller: InspectorHandle) -> Result<Transport> {
    let origin = expected_origin(url)?;
    let (tx, inbox) = mpsc::unbounded_channel();
    let target = DemoTarget {
        history: vec![seed_state()],
        cursor: 0,
        location: url.to_string(),
        origin,
        pending_push: false,
        inbox,
        controller,
    };
    tokio::spawn(target.run());

    let port = DemoPort { tx };
    Ok(match mode {
        RouteMode::Iframe => Transport::Frame(Arc::new(DemoFrame {
            port: Arc::new(port),
        })),
        RouteMode::Window => Transport::Window(Box::new(DemoWindow {
            port,
            closed: AtomicBool::new(false),
        })),
    })
}

fn seed_state() -> AppState {
    AppState::Mapping(BTreeMap::from([
        ("counter".to_string(), AppState::Number(0)),
        (
            "title".to_string(),
            AppState::Text("demo application".to_string()),
        ),
        (
            "todos".to_string(),
            AppState::Sequence(vec![AppState::Mapping(BTreeMap::from([
                ("done".to_string(), AppState::Bool(false)),
                (
                    "label".to_string(),
                    AppState::Text("try the inspector".to_string()),
                ),
            ]))]),
        ),
    ]))
}

struct DemoPort {
    tx: UnboundedSender<Value>,
}

impl TargetPort for DemoPort {
    fn post(&self, message: Value) {
        let _ = self.tx.send(message);
    }
}

struct DemoFrame {
    port: Arc<DemoPort>,
}

impl FrameHost for DemoFrame {
    fn content(&self) -> Option<Arc<dyn TargetPort>> {
        Some(Arc::clone(&self.port) as Arc<dyn TargetPort>)
    }
}

struct DemoWindow {
    port: DemoPort,
    closed: AtomicBool,
}

impl TargetPort for DemoWindow {
    fn post(&self, message: Value) {
        if !self.closed.load(Ordering::SeqCst) {
            self.port.post(message);
        }
    }
}

impl WindowHandle for DemoWindow {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

struct DemoTarget {
    /// State history; `set state` truncates the redo tail and appends.
    history: Vec<AppState>,
    cursor: usize,
    location: String,
    origin: String,
    /// One-shot: armed by `subscribe state update`, consumed by the next
    /// state change.
    pending_push: bool,
    inbox: UnboundedReceiver<Value>,
    controller: InspectorHandle,
}

impl DemoTarget {
    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            self.handle(message);
        }
        debug!(target = "flipscope.demo", "binding dropped; demo target exiting");
    }

    fn handle(&mut self, message: Value) {
        if !has_protocol_tag(&message) {
            debug!(target = "flipscope.demo", "untagged message; ignoring");
            return;
        }
        let request = match serde_json::from_value::<Outbound>(message) {
            Ok(request) => request,
            Err(_) => {
                debug!(target = "flipscope.demo", "unrecognized message type; ignoring");
                return;
            }
        };
        match request {
            Outbound::GetState => self.push_snapshot(),
            Outbound::SubscribeStateUpdate => self.pending_push = true,
            Outbound::SetState { state } => match AppState::parse(&state) {
                Ok(next) => {
                    self.history.truncate(self.cursor + 1);
                    self.history.push(next);
                    self.cursor = self.history.len() - 1;
                    self.fire_pending();
                }
                Err(err) => {
                    warn!(target = "flipscope.demo", error = %err, "rejecting malformed set state");
                }
            },
            Outbound::MoveHistoryBackwards => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.fire_pending();
                }
            }
            Outbound::MoveHistoryForwards => {
                if self.cursor + 1 < self.history.len() {
                    self.cursor += 1;
                    self.fire_pending();
                }
            }
        }
    }

    fn fire_pending(&mut self) {
        if self.pending_push {
            self.pending_push = false;
            self.push_snapshot();
        }
    }

    fn push_snapshot(&self) {
        self.controller.channel_event(ChannelEvent::new(
            self.origin.clone(),
            json!({
                "protocol": PROTOCOL_TAG,
                "type": "application state",
                "state": self.history[self.cursor].serialize(),
                "location": self.location,
            }),
        ));
    }
}
