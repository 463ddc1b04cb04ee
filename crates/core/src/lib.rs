//! Controller-side core of the flipstate devtool: the cross-context sync
//! session, the path-addressed tree codec it carries, and the transport
//! bindings that reach the inspected application context.
//!
//! Rendering of widgets, page layout, and address-bar handling live in the
//! embedding; this crate only knows that a leaf changed and which path it
//! lives at.

pub mod codec;
pub mod error;
pub mod inspector;
pub mod origin;
pub mod path;
pub mod poll;
pub mod session;
pub mod state;
pub mod testing;
pub mod transport;

pub use codec::{LeafKind, RawEdit, RenderItem, apply_edit, encode, render_text, value_at};
pub use error::{Error, Result};
pub use inspector::{Command, Event, Inspector, InspectorHandle};
pub use origin::ChannelEvent;
pub use path::{Path, Step};
pub use poll::POLL_INTERVAL;
pub use session::{ConnectionMode, SyncSession};
pub use state::AppState;
pub use transport::{FrameHost, TargetPort, Transport, WindowHandle};
