//! Interactive command loop mirroring the devtool's controls.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use flipscope::{AppState, Command, InspectorHandle, LeafKind, Path, RawEdit, value_at};

use crate::demo;
use crate::route::RouteMode;
use crate::view::SharedView;

const HELP: &str = "\
commands:
  show                 print the current snapshot
  refresh              request a fresh snapshot
  auto on|off          toggle push subscription
  edit                 enter edit mode
  set <path> <value>   edit a leaf, e.g. `set /todos/0/done true`
  save                 send edits to the target and leave edit mode
  cancel               discard edits and leave edit mode
  back | forward       navigate the target's state history
  open <iframe|window> <url>
                       reconnect to another target
  quit
";

pub async fn run(handle: InspectorHandle, view: SharedView) -> anyhow::Result<()> {
    println!("flipscope - `help` lists commands");
    prompt()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() && !dispatch_line(line, &handle, &view)? {
            return Ok(());
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> anyhow::Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Handle one input line. Returns `false` when the loop should exit.
fn dispatch_line(line: &str, handle: &InspectorHandle, view: &SharedView) -> anyhow::Result<bool> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    match verb {
        "help" => print!("{HELP}"),
        "show" => print!("{}", view.render()),
        "refresh" => handle.command(Command::Refresh),
        "auto" => match parts.next() {
            Some("on") => handle.command(Command::SetSubscribed(true)),
            Some("off") => handle.command(Command::SetSubscribed(false)),
            _ => println!("usage: auto on|off"),
        },
        "edit" => handle.command(Command::StartEdit),
        "save" => handle.command(Command::SaveEdit),
        "cancel" => handle.command(Command::CancelEdit),
        "back" => handle.command(Command::HistoryBack),
        "forward" => handle.command(Command::HistoryForward),
        "set" => {
            let (Some(pointer), Some(first)) = (parts.next(), parts.next()) else {
                println!("usage: set <path> <value>");
                return Ok(true);
            };
            let value = std::iter::once(first)
                .chain(parts)
                .collect::<Vec<_>>()
                .join(" ");
            if !view.editing() {
                println!("not editing; run `edit` first");
                return Ok(true);
            }
            match build_edit(view, pointer, &value) {
                Ok(command) => handle.command(command),
                Err(message) => println!("{message}"),
            }
        }
        "open" => {
            let (Some(mode), Some(url)) = (parts.next(), parts.next()) else {
                println!("usage: open <iframe|window> <url>");
                return Ok(true);
            };
            let mode = match mode {
                "iframe" => RouteMode::Iframe,
                "window" => RouteMode::Window,
                other => {
                    println!("unknown mode `{other}`");
                    return Ok(true);
                }
            };
            match demo::spawn(mode, url, handle.clone()) {
                Ok(binding) => handle.command(Command::Connect {
                    binding,
                    url: url.to_string(),
                }),
                Err(err) => println!("{err}"),
            }
        }
        "quit" | "exit" => return Ok(false),
        other => println!("unknown command `{other}`; try `help`"),
    }
    Ok(true)
}

/// Resolve the leaf kind from the cached snapshot and build the edit.
fn build_edit(view: &SharedView, pointer: &str, value: &str) -> Result<Command, String> {
    let Some(state) = view.state() else {
        return Err("no snapshot yet".to_string());
    };
    let path = Path::parse_pointer(pointer);
    let Some(node) = value_at(&state, &path) else {
        return Err(format!("no node at `{path}`"));
    };
    let (kind, raw) = match node {
        AppState::Bool(_) => match value {
            "true" => (LeafKind::Bool, RawEdit::Toggle(true)),
            "false" => (LeafKind::Bool, RawEdit::Toggle(false)),
            other => return Err(format!("`{other}` is not a boolean")),
        },
        AppState::Number(_) => (LeafKind::Number, RawEdit::Entry(value.to_string())),
        AppState::Text(_) => (LeafKind::Text, RawEdit::Entry(value.to_string())),
        _ => return Err(format!("`{path}` is not an editable leaf")),
    };
    Ok(Command::EditLeaf { path, kind, raw })
}
