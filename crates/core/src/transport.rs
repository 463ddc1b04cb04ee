//! Channel bindings for posting protocol messages to the target context.
//!
//! A session owns exactly one live binding. Sends are fire-and-forget with
//! no delivery confirmation; the other direction arrives through the event
//! loop as [`ChannelEvent`](crate::origin::ChannelEvent)s.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use flipscope_protocol::{Envelope, Outbound};

/// Receiving end of a cross-context channel.
pub trait TargetPort: Send + Sync {
    fn post(&self, message: Value);
}

/// An embedded frame. The content port is resolved at every send, not
/// captured once: the frame's content identity survives navigation of the
/// embedded document.
pub trait FrameHost: Send + Sync {
    fn content(&self) -> Option<Arc<dyn TargetPort>>;
}

/// An owned top-level window handle, captured at open and valid until
/// explicitly closed.
pub trait WindowHandle: TargetPort {
    fn close(&self);
}

/// The single live channel binding owned by a sync session.
pub enum Transport {
    Disconnected,
    Frame(Arc<dyn FrameHost>),
    Window(Box<dyn WindowHandle>),
}

impl Transport {
    pub fn is_live(&self) -> bool {
        !matches!(self, Transport::Disconnected)
    }

    /// Post a message on the bound channel. A disconnected binding is a
    /// no-op, never an error.
    pub fn send(&self, message: Outbound) {
        let Ok(payload) = serde_json::to_value(Envelope::new(message)) else {
            debug!(target = "flipscope.transport", "unserializable message; dropping send");
            return;
        };
        match self {
            Transport::Disconnected => {}
            Transport::Frame(frame) => match frame.content() {
                Some(port) => port.post(payload),
                None => debug!(
                    target = "flipscope.transport",
                    "frame has no content port; dropping send"
                ),
            },
            Transport::Window(window) => window.post(payload),
        }
    }

    /// Replace the live binding. A previously owned window handle is
    /// closed first so rebinding never leaks an orphaned top-level window.
    pub fn rebind(&mut self, next: Transport) {
        if let Transport::Window(window) = &*self {
            window.close();
        }
        *self = next;
    }
}
