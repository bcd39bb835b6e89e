//! src/error.rs
//! ============================================================================
//! # Error types for the search client
//!
//! `AppError` is the application-wide error used by config, logging and the
//! terminal shell. `SearchError` is what a search backend reports; it is
//! `Clone` because it travels inside `Action`s through the event loop.

use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

/// Status code a backend reports when the upstream provider rate-limits us.
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Shown when the provider refuses the query because of rate limiting.
pub const RATE_LIMIT_MESSAGE: &str =
    "Sorry, google forces a limit to private searches, try again in a moment please.";

/// Shown for every other search failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, there was an error.";

/// Failure of a single search call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Upstream answered with a non-success status.
    #[error("Search provider answered with status {code}")]
    Status { code: u16 },

    /// The backend program could not be started.
    #[error("Failed to spawn search command '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// The backend program exited unsuccessfully.
    #[error("Search command '{program}' failed (exit code: {code:?})\n{stderr}")]
    Command {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Backend output was not a valid result list.
    #[error("Malformed search response: {0}")]
    Decode(String),

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    /// Local index could not be read.
    #[error("Search index {path:?} unavailable: {reason}")]
    Index { path: PathBuf, reason: String },
}

impl SearchError {
    /// Status code carried by this failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { code } => Some(*code),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(RATE_LIMIT_STATUS))
    }

    /// Message surfaced in the UI for this failure.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        if self.is_rate_limited() {
            RATE_LIMIT_MESSAGE
        } else {
            GENERIC_ERROR_MESSAGE
        }
    }

    pub fn decode<S: Into<String>>(reason: S) -> Self {
        Self::Decode(reason.into())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Unified error type for the application shell and its services.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not determine the platform config/data directories.
    #[error("Could not determine {0} directory")]
    NoProjectDir(&'static str),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Malformed location string.
    #[error("Invalid location '{input}': {reason}")]
    Location { input: String, reason: String },

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    #[must_use]
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    pub fn location<S1: Into<String>, S2: Into<String>>(input: S1, reason: S2) -> Self {
        Self::Location {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
