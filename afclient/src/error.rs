//! Error taxonomy for the client.
//!
//! Every failure is surfaced to the caller that triggered the lazy
//! resolution or the mutation; the client never substitutes defaults and
//! never retries on its own.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AfResult<T> = Result<T, AfError>;

/// The structural change kinds a [`TrackedCollection`](crate::TrackedCollection)
/// can report. `Replace`, `Reset` and `Move` have no remote counterpart and
/// are always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Remove,
    Replace,
    Reset,
    Move,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChangeKind::Add => "Add",
            ChangeKind::Remove => "Remove",
            ChangeKind::Replace => "Replace",
            ChangeKind::Reset => "Reset",
            ChangeKind::Move => "Move",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by lazy resolution, collection synchronization and the
/// WebAPI loader backends.
#[derive(Debug, Error)]
pub enum AfError {
    /// `find`/`find_by_path` matched no remote object.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The underlying call to the backend failed (network, 5xx, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a payload the client could not decode.
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// A structural collection edit that cannot be mirrored remotely.
    #[error("{0} is not supported on tracked collections")]
    Unsupported(ChangeKind),

    /// A remote mutator reported failure for a create/update/delete.
    #[error("remote {operation} failed for '{target}'")]
    Rejected {
        operation: &'static str,
        target: String,
    },

    /// Parent resolution was attempted on a root path.
    #[error("object at '{0}' has no parent")]
    NoParent(String),
}

impl From<reqwest::Error> for AfError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AfError::Decode(err.to_string())
        } else {
            AfError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AfError {
    fn from(err: serde_json::Error) -> Self {
        AfError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for AfError {
    fn from(err: url::ParseError) -> Self {
        AfError::Transport(format!("invalid url: {}", err))
    }
}
