//! CLI-level errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid route `{0}`; expected {{iframe|window}}/{{url}}")]
    Route(String),

    #[error("invalid target url: {0}")]
    Url(#[from] url::ParseError),
}
