//! Failures of a `canvas-lab` invocation and their exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 2    | argument parsing (clap, before `run`) |
//! | 10   | engine lookup or run geometry |
//! | 11   | reading or writing a file |
//! | 12   | malformed user input (`--params`, seed documents) |
//! | 13   | encoding `--json` output |

use canvas_lab_core::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(EngineError),

    #[error("cannot read seed document {}: {source}", .path.display())]
    SeedRead { path: PathBuf, source: io::Error },

    #[error("invalid seed document {}: {source}", .path.display())]
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot write seed document {}: {source}", .path.display())]
    SeedWrite { path: PathBuf, source: io::Error },

    /// PNG encoding or writing failed.
    #[error("snapshot failed: {0}")]
    Snapshot(String),

    #[error("invalid --params: {0}")]
    Params(String),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::SeedRead { .. } | CliError::SeedWrite { .. } | CliError::Snapshot(_) => 11,
            CliError::SeedParse { .. } | CliError::Params(_) => 12,
            CliError::Output(_) => 13,
        }
    }
}

impl From<EngineError> for CliError {
    /// The only file I/O behind an engine call is the PNG snapshot.
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Snapshot(msg),
            other => CliError::Engine(other),
        }
    }
}
