use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    /// The operator pressed the abort key or closed the window
    #[error("session aborted by operator")]
    Aborted,
    #[error("input source closed")]
    InputClosed,
    #[error("display failed: {0}")]
    Display(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("lag must be at least 1")]
    ZeroLag,
    #[error("target quota {quota} exceeds {trials} trials per block")]
    QuotaExceedsBlock { quota: usize, trials: usize },
    #[error("alphabet needs at least two letters, got {0}")]
    AlphabetTooSmall(usize),
    #[error("mask has {mask} entries for {letters} letters")]
    MaskLength { mask: usize, letters: usize },
    #[error("position {index} breaks the n-back constraint")]
    Constraint { index: usize },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio clip not found: {0}")]
    Missing(PathBuf),
    #[error("failed to start audio player: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}
