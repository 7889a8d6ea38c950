//! Error types for the chunk pre-generation scheduler.

use thiserror::Error;

/// Failures reported by the tile primitive for a single tile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("Failed to materialize tile ({x}, {z}) in '{world}': {reason}")]
    Materialize {
        world: String,
        x: i32,
        z: i32,
        reason: String,
    },

    #[error("Failed to release tile ({x}, {z}) in '{world}': {reason}")]
    Release {
        world: String,
        x: i32,
        z: i32,
        reason: String,
    },
}

/// Failures reported by the host's recurring-invocation primitive.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Host rejected recurring task: {0}")]
    ScheduleRejected(String),

    #[error("Tile primitive error: {0}")]
    Tile(#[from] TileError),
}

/// Top-level errors surfaced by the scheduler, command front end and CLI.
#[derive(Debug, Error)]
pub enum PregenError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Batch aborted: {0}")]
    Tile(#[from] TileError),

    #[error("World not found '{0}'")]
    WorldNotFound(String),

    #[error("Sorry, you don't have permission to pregenerate chunks.")]
    PermissionDenied,

    #[error("Invalid command. Usage:\n{}", .0.join("\n"))]
    Usage(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PregenError {
    fn from(err: config::ConfigError) -> Self {
        PregenError::ConfigError(err.to_string())
    }
}
