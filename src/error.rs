//! # Errors
//!
//! A single error type shared by the graph model, the compiler and project I/O.

use std::path::PathBuf;

use crate::graph::{ConnectionId, Port, Uid};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ChroniclerError>;

#[derive(Debug, thiserror::Error)]
pub enum ChroniclerError {
    #[error("UID {0} is already in use")]
    DuplicateUid(Uid),

    #[error("bubble not found: {0}")]
    BubbleNotFound(Uid),

    #[error("connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    #[error("scene not found: {0}")]
    SceneNotFound(String),

    #[error("a scene named '{0}' already exists")]
    DuplicateScene(String),

    #[error("scene '{0}' already has a start bubble")]
    DuplicateStart(String),

    #[error("scene '{0}' has no start bubble")]
    MissingStart(String),

    #[error("bubble {uid} has no '{port}' link slot")]
    InvalidPort { uid: Uid, port: Port },

    #[error("bubble {0} is not a choice bubble")]
    NotAChoice(Uid),

    #[error("bubble {0} cannot be the target of a link")]
    InvalidTarget(Uid),

    #[error("the start bubble of a scene cannot be removed")]
    CannotRemoveStart,

    #[error("the startup scene cannot be removed")]
    CannotRemoveStartup,

    #[error("the startup scene cannot be renamed")]
    CannotRenameStartup,

    #[error("project has no 'startup' scene")]
    MissingStartup,

    #[error("script emission exceeded the maximum depth of {limit} at bubble {uid}")]
    DepthLimitExceeded { uid: Uid, limit: usize },

    #[error("unsupported project format version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid compile option: {0}")]
    InvalidOption(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChroniclerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChroniclerError::Io {
            path: path.into(),
            source,
        }
    }
}
