//! Error types for the inspector core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A serialized state payload was not well-formed JSON.
    #[error("malformed state payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed, but contains a shape the state model cannot
    /// represent (null, fractional or oversized number).
    #[error("unsupported value in state payload: {0}")]
    Unsupported(String),

    /// A patch addressed a node that does not exist in the current tree.
    #[error("no node at path `{0}`")]
    Addressing(String),

    /// Raw edit text could not be converted to the declared leaf kind.
    #[error("invalid {kind} literal `{raw}`")]
    Literal { kind: &'static str, raw: String },

    /// The session's target URL could not be parsed into an origin.
    #[error("invalid target url: {0}")]
    TargetUrl(#[from] url::ParseError),

    /// An operation was requested in a session state that forbids it.
    #[error("{0}")]
    InvalidTransition(&'static str),
}
