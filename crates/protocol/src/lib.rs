//! Wire types for the flipstate devtool protocol.
//!
//! This crate contains the serde-serializable types exchanged between the
//! controller and the inspected application context. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with protocol: Match the `flipstate-devtool v1` message contract
//! * Stable: Changes only when the wire protocol changes
//!
//! The session state machine and transport live in `flipscope-core`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version tag embedded in every message on the wire. Messages carrying a
/// different tag (or none) are dropped before they reach the session.
pub const PROTOCOL_TAG: &str = "flipstate-devtool v1";

/// Messages the controller posts to the application context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Outbound {
    /// Request one snapshot of the current application state.
    #[serde(rename = "get state")]
    GetState,
    /// Request a single future push on the next state change.
    #[serde(rename = "subscribe state update")]
    SubscribeStateUpdate,
    /// Overwrite the application's state with a serialized snapshot.
    #[serde(rename = "set state")]
    SetState { state: String },
    /// Navigate the application's internal history back.
    #[serde(rename = "move history backwards")]
    MoveHistoryBackwards,
    /// Navigate the application's internal history forward.
    #[serde(rename = "move history forwards")]
    MoveHistoryForwards,
}

/// Messages the application context posts back to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Inbound {
    /// Snapshot push: the serialized state plus the application's current URL.
    #[serde(rename = "application state")]
    ApplicationState { state: String, location: String },
}

/// A message wrapped with the protocol version tag, as posted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub protocol: String,
    #[serde(flatten)]
    pub message: T,
}

impl<T> Envelope<T> {
    pub fn new(message: T) -> Self {
        Self {
            protocol: PROTOCOL_TAG.to_string(),
            message,
        }
    }
}

/// Whether a raw payload carries the expected protocol tag.
pub fn has_protocol_tag(data: &Value) -> bool {
    data.get("protocol").and_then(Value::as_str) == Some(PROTOCOL_TAG)
}

/// Parse an inbound payload, ignoring unrecognized `type` values.
pub fn parse_inbound(data: &Value) -> Option<Inbound> {
    serde_json::from_value(data.clone()).ok()
}
