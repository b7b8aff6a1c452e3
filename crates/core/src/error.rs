//! Error types for canvas-lab.
//!
//! The engine contract itself is total: nothing on [`Engine`](crate::Engine)
//! returns an error. These variants cover the fallible edges around it
//! (engine lookup, seed documents, snapshot I/O).

use thiserror::Error;

/// Errors produced outside the per-frame engine contract.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero where a real surface size is required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An engine tag, label, or slug did not match any known engine.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// Reading or writing an external file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
