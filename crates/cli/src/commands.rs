//! Command dispatch.

use std::path::PathBuf;

use anyhow::Context;

use flipscope::{AppState, Command, Inspector, render_text};

use crate::cli::Commands;
use crate::demo;
use crate::repl;
use crate::route::Route;
use crate::view::SharedView;

pub async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Connect { route } => {
            let route: Route = route.parse()?;
            connect(route).await
        }
        Commands::Render { file } => render(file),
    }
}

async fn connect(route: Route) -> anyhow::Result<()> {
    let (mut inspector, handle) = Inspector::new();
    let view = SharedView::default();
    {
        let view = view.clone();
        inspector.on_change(move |session| view.update(session));
    }
    let loop_task = tokio::spawn(inspector.run());

    let binding = demo::spawn(route.mode, &route.url, handle.clone())?;
    handle.command(Command::Connect {
        binding,
        url: route.url.clone(),
    });

    repl::run(handle.clone(), view).await?;

    handle.shutdown();
    loop_task.await.context("event loop panicked")?;
    Ok(())
}

fn render(file: Option<PathBuf>) -> anyhow::Result<()> {
    let payload = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let state = AppState::parse(&payload)?;
    print!("{}", render_text(&state));
    Ok(())
}
