//! Error handling and custom error types
//!
//! Every failure of a chat request falls into one of three terminal kinds
//! (network, HTTP status, malformed body). Configuration and setup errors
//! share the same enum so binaries can propagate with `?`.

use thiserror::Error;

/// Longest response-body excerpt carried by [`Error::HttpStatus`].
pub const BODY_EXCERPT_LIMIT: usize = 500;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    HttpStatus,
    MalformedBody,
    Config,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Network(_) => FailureKind::Network,
            Error::HttpStatus { .. } => FailureKind::HttpStatus,
            Error::MalformedBody(_) => FailureKind::MalformedBody,
            Error::Config(_) | Error::EnvVar(_) | Error::Io(_) => FailureKind::Config,
        }
    }

    /// Builds an [`Error::HttpStatus`], truncating the body to
    /// [`BODY_EXCERPT_LIMIT`] characters.
    pub fn http_status(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(BODY_EXCERPT_LIMIT) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        Error::HttpStatus { status, body }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
