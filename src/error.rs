//! Error types for rendering, geometry loading and settings files.

use thiserror::Error;

/// A render call failed outright. The target canvas may already hold a
/// partially painted frame and must be treated as unreliable.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate {what} ({count} elements)")]
    Allocation { what: &'static str, count: usize },
    #[error("canvas has zero area ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
}

/// A geometry file could not be read. No list is produced on error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad header: expected `{expected}`, found `{found}`")]
    BadHeader { expected: &'static str, found: String },
    #[error("truncated record {record}: expected {expected} values")]
    Truncated { record: usize, expected: usize },
    #[error("invalid number `{token}` in record {record}")]
    BadNumber { token: String, record: usize },
    #[error("invalid color `{token}` in record {record}")]
    BadColor { token: String, record: usize },
    #[error("invalid patch flags `{token}` in record {record}")]
    BadFlags { token: String, record: usize },
    #[error("file declares {declared} records but contains {found}")]
    CountMismatch { declared: usize, found: usize },
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("{0}")]
    Allocation(#[from] RenderError),
}

/// A settings file could not be read or written.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// A vector export could not be produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Render(#[from] RenderError),
}
