//! The controller's navigation surface.
//!
//! A route is `{mode}/{url}`, e.g. `iframe/http://localhost:8080/`, so
//! relaunching the controller with a saved route reopens the same
//! connection target. Presentational only; not part of the wire protocol.

use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Iframe,
    Window,
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMode::Iframe => f.write_str("iframe"),
            RouteMode::Window => f.write_str("window"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub mode: RouteMode,
    pub url: String,
}

impl FromStr for Route {
    type Err = CliError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (mode, url) = text
            .split_once('/')
            .ok_or_else(|| CliError::Route(text.to_string()))?;
        let mode = match mode {
            "iframe" => RouteMode::Iframe,
            "window" => RouteMode::Window,
            _ => return Err(CliError::Route(text.to_string())),
        };
        url::Url::parse(url)?;
        Ok(Route {
            mode,
            url: url.to_string(),
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mode, self.url)
    }
}
