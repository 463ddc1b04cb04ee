use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flipscope")]
#[command(about = "flipstate devtool - inspect and edit a running application's state")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to a target and inspect its state interactively
    #[command(alias = "open")]
    Connect {
        /// Connection route, `{iframe|window}/{url}`
        route: String,
    },

    /// Render a JSON document in the path-addressed editable form
    Render {
        /// Input file (defaults to stdin)
        file: Option<PathBuf>,
    },
}
