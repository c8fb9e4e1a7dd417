// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Only the configuration and rendering layers can fail out of `run`;
//! supervision failures are folded into the `ProcessResult` instead
//! (see `supervise::supervisor`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MuffleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MuffleError>;
