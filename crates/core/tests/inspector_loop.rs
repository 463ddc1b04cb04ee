//! End-to-end behavior of the inspector event loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use flipscope::testing::{RecordingPort, StaticFrame};
use flipscope::{
    ChannelEvent, Command, Inspector, LeafKind, Path, RawEdit, Transport, render_text,
};
use flipscope_protocol::PROTOCOL_TAG;

const TARGET: &str = "http://localhost:8080/";

fn frame_binding(port: &RecordingPort) -> Transport {
    Transport::Frame(Arc::new(StaticFrame::new(port)))
}

fn push(state: &str) -> ChannelEvent {
    ChannelEvent::new(
        "http://localhost:8080",
        json!({
            "protocol": PROTOCOL_TAG,
            "type": "application state",
            "state": state,
            "location": TARGET,
        }),
    )
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test(start_paused = true)]
async fn connect_push_edit_save_round_trip() {
    // Poll interval far beyond the test horizon so only explicit traffic
    // lands in the capture.
    let (mut inspector, handle) = Inspector::with_poll_interval(Duration::from_secs(3600));

    let renders: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    {
        let renders = Arc::clone(&renders);
        inspector.on_change(move |session| {
            if let Some(state) = session.last_state() {
                renders.lock().unwrap().push(render_text(state));
            }
        });
    }

    let port = RecordingPort::new();
    let loop_task = tokio::spawn(inspector.run());

    handle.command(Command::Connect {
        binding: frame_binding(&port),
        url: TARGET.to_string(),
    });
    settle().await;
    assert_eq!(port.take_types(), ["get state", "subscribe state update"]);

    handle.channel_event(push(r#"{"a":1,"b":[true,"x"]}"#));
    settle().await;
    let latest = renders.lock().unwrap().last().cloned().unwrap();
    assert_eq!(latest, "{\n  a: 1\n  b: [\n    true\n    x\n  ]\n}\n");
    assert_eq!(port.take_types(), ["subscribe state update"]);

    handle.command(Command::StartEdit);
    handle.command(Command::EditLeaf {
        path: Path::root().child_key("b").child_index(0),
        kind: LeafKind::Bool,
        raw: RawEdit::Toggle(false),
    });
    handle.command(Command::SaveEdit);
    settle().await;

    let sent = port.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["type"], "set state");
    assert_eq!(sent[0]["state"], r#"{"a":1,"b":[false,"x"]}"#);
    assert_eq!(sent[1]["type"], "get state");

    handle.shutdown();
    loop_task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn poll_fires_within_interval_and_stops_on_edit() {
    let (inspector, handle) = Inspector::with_poll_interval(Duration::from_millis(10));
    let port = RecordingPort::new();
    let loop_task = tokio::spawn(inspector.run());

    handle.command(Command::Connect {
        binding: frame_binding(&port),
        url: TARGET.to_string(),
    });
    tokio::time::sleep(Duration::from_millis(55)).await;

    let refreshes = port
        .take_types()
        .iter()
        .filter(|kind| *kind == "get state")
        .count();
    assert!(
        refreshes >= 2,
        "connect plus at least one poll, got {refreshes}"
    );

    handle.channel_event(push(r#"{"a":1}"#));
    settle().await;
    handle.command(Command::StartEdit);
    settle().await;
    port.take();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        port.take().is_empty(),
        "no protocol traffic while an edit is in progress"
    );

    handle.shutdown();
    loop_task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn polling_resumes_after_save() {
    let (inspector, handle) = Inspector::with_poll_interval(Duration::from_millis(10));
    let port = RecordingPort::new();
    let loop_task = tokio::spawn(inspector.run());

    handle.command(Command::Connect {
        binding: frame_binding(&port),
        url: TARGET.to_string(),
    });
    handle.channel_event(push(r#"{"a":1}"#));
    settle().await;
    handle.command(Command::StartEdit);
    handle.command(Command::SaveEdit);
    settle().await;
    port.take();

    tokio::time::sleep(Duration::from_millis(55)).await;
    let refreshes = port
        .take_types()
        .iter()
        .filter(|kind| *kind == "get state")
        .count();
    assert!(refreshes >= 2, "poll chain resumed after save, got {refreshes}");

    handle.shutdown();
    loop_task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reconnect_leaves_a_single_poll_chain() {
    let (inspector, handle) = Inspector::with_poll_interval(Duration::from_millis(20));
    let port = RecordingPort::new();
    let loop_task = tokio::spawn(inspector.run());

    handle.command(Command::Connect {
        binding: frame_binding(&port),
        url: TARGET.to_string(),
    });
    handle.command(Command::Connect {
        binding: frame_binding(&port),
        url: TARGET.to_string(),
    });
    settle().await;
    port.take();

    tokio::time::sleep(Duration::from_millis(205)).await;
    let refreshes = port
        .take_types()
        .iter()
        .filter(|kind| *kind == "get state")
        .count();
    // A duplicated chain would roughly double the cadence.
    assert!(
        (2..=14).contains(&refreshes),
        "expected one poll chain's worth of refreshes, got {refreshes}"
    );

    handle.shutdown();
    loop_task.await.unwrap();
}
