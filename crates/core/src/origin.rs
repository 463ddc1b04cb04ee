//! Origin screening for inbound cross-context events.
//!
//! This is the system's only authentication mechanism. It assumes the
//! hosting environment's origin model is trustworthy and performs no
//! additional signing. Screening is a pure function over a synthetic
//! event, independent of any listener registry, so it can be exercised
//! directly in tests.

use serde_json::Value;
use tracing::debug;
use url::Url;

use flipscope_protocol::has_protocol_tag;

use crate::error::Result;

/// An event as delivered by the hosting environment's message channel:
/// the sender's declared origin plus the raw payload.
#[derive(Debug, Clone)]
pub struct ChannelEvent {
    pub origin: String,
    pub data: Value,
}

impl ChannelEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Derive the origin (scheme+host+port) the session expects messages from.
pub fn expected_origin(target_url: &str) -> Result<String> {
    let url = Url::parse(target_url)?;
    Ok(url.origin().ascii_serialization())
}

/// Screen one inbound event against the current target URL and edit mode.
///
/// Returns the payload only when the declared origin matches the target
/// URL's origin, the protocol tag is present and current, and no edit is
/// in progress. Failures are silent drops; filtering is intentional, not
/// a fault.
pub fn screen<'a>(event: &'a ChannelEvent, target_url: &str, editing: bool) -> Option<&'a Value> {
    let expected = match expected_origin(target_url) {
        Ok(origin) => origin,
        Err(err) => {
            debug!(
                target = "flipscope.origin",
                error = %err,
                "target url unparseable; dropping event"
            );
            return None;
        }
    };
    if event.origin != expected {
        debug!(
            target = "flipscope.origin",
            origin = %event.origin,
            %expected,
            "origin mismatch; dropping event"
        );
        return None;
    }
    if !has_protocol_tag(&event.data) {
        debug!(
            target = "flipscope.origin",
            "missing or mismatched protocol tag; dropping event"
        );
        return None;
    }
    if editing {
        debug!(target = "flipscope.origin", "edit in progress; dropping push");
        return None;
    }
    Some(&event.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipscope_protocol::PROTOCOL_TAG;
    use serde_json::json;

    fn push() -> Value {
        json!({
            "protocol": PROTOCOL_TAG,
            "type": "application state",
            "state": "{}",
            "location": "http://localhost:8080/",
        })
    }

    #[test]
    fn expected_origin_strips_path_and_keeps_port() {
        assert_eq!(
            expected_origin("http://localhost:8080/app/index.html").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            expected_origin("https://example.com/").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn matching_origin_passes() {
        let event = ChannelEvent::new("http://localhost:8080", push());
        assert!(screen(&event, "http://localhost:8080/", false).is_some());
    }

    #[test]
    fn foreign_origin_is_dropped() {
        let event = ChannelEvent::new("https://evil.example", push());
        assert!(screen(&event, "http://localhost:8080/", false).is_none());
    }

    #[test]
    fn missing_or_stale_tag_is_dropped() {
        let event = ChannelEvent::new(
            "http://localhost:8080",
            json!({"type": "application state", "state": "{}"}),
        );
        assert!(screen(&event, "http://localhost:8080/", false).is_none());

        let event = ChannelEvent::new(
            "http://localhost:8080",
            json!({"protocol": "flipstate-devtool v0", "type": "application state"}),
        );
        assert!(screen(&event, "http://localhost:8080/", false).is_none());
    }

    #[test]
    fn editing_drops_even_well_formed_events() {
        let event = ChannelEvent::new("http://localhost:8080", push());
        assert!(screen(&event, "http://localhost:8080/", true).is_none());
    }

    #[test]
    fn unparseable_target_url_drops_everything() {
        let event = ChannelEvent::new("http://localhost:8080", push());
        assert!(screen(&event, "not a url", false).is_none());
    }
}
