//! Error types for vellum.

use thiserror::Error;

/// The main error type for vellum operations.
#[derive(Error, Debug)]
pub enum VellumError {
    /// A drawable with the given name already exists in the scene.
    #[error("object '{0}' already exists")]
    NameExists(String),

    /// No drawable with the given name was found.
    #[error("object '{0}' not found")]
    ObjectNotFound(String),

    /// A scene index was out of bounds.
    #[error("object index {index} out of bounds (scene has {len} objects)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A drawable was constructed with the wrong number of points.
    #[error("{kind} requires {expected} point(s), got {actual}")]
    InvalidPointCount {
        kind: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// A color string was not a valid `#RRGGBB` / `#RGB` hex triple.
    #[error("invalid color '{0}' (expected #RRGGBB or #RGB)")]
    InvalidColor(String),

    /// A surface control net had unusable dimensions.
    #[error("invalid control net: {0}")]
    InvalidControlNet(String),

    /// A transformation operation was issued with no session in progress.
    #[error("no transformation in progress - call begin_transform first")]
    NoPendingTransform,

    /// A world file could not be parsed.
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;
