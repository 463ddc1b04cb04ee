//! In-memory fakes for exercising sessions without a hosting environment.
//!
//! The shape mirrors a capture/inject harness: posted messages land in a
//! shared buffer for later inspection, and inbound events are fed straight
//! into the session or event loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::transport::{FrameHost, TargetPort, WindowHandle};

/// Port that records every posted message.
#[derive(Clone, Default)]
pub struct RecordingPort {
    sent: Arc<Mutex<Vec<Value>>>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all captured messages, clearing the buffer.
    pub fn take(&self) -> Vec<Value> {
        let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *sent)
    }

    /// The `type` field of every captured message, clearing the buffer.
    pub fn take_types(&self) -> Vec<String> {
        self.take()
            .iter()
            .filter_map(|message| message.get("type").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

impl TargetPort for RecordingPort {
    fn post(&self, message: Value) {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }
}

/// Frame host whose content port can be swapped, simulating the embedded
/// document navigating in or away.
#[derive(Clone, Default)]
pub struct StaticFrame {
    content: Arc<Mutex<Option<Arc<dyn TargetPort>>>>,
}

impl StaticFrame {
    /// A frame with nothing loaded; sends resolve to no port.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(port: &RecordingPort) -> Self {
        let frame = Self::default();
        frame.load(port);
        frame
    }

    /// Point the frame's content at a port.
    pub fn load(&self, port: &RecordingPort) {
        let mut content = self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *content = Some(Arc::new(port.clone()));
    }
}

impl FrameHost for StaticFrame {
    fn content(&self) -> Option<Arc<dyn TargetPort>> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Window handle that records posts until closed.
#[derive(Clone, Default)]
pub struct FakeWindow {
    port: RecordingPort,
    closed: Arc<AtomicBool>,
}

impl FakeWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close outside the transport, as a user closing the window would.
    pub fn close_handle(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn take(&self) -> Vec<Value> {
        self.port.take()
    }

    pub fn take_types(&self) -> Vec<String> {
        self.port.take_types()
    }
}

impl TargetPort for FakeWindow {
    fn post(&self, message: Value) {
        if !self.is_closed() {
            self.port.post(message);
        }
    }
}

impl WindowHandle for FakeWindow {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
