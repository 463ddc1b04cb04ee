//! flipscope CLI: route parsing, logging setup, the interactive loop, and
//! an in-process demo target for exercising a session end-to-end.

pub mod cli;
pub mod commands;
pub mod demo;
pub mod error;
pub mod logging;
pub mod repl;
pub mod route;
pub mod view;
