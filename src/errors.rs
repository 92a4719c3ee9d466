//! Unified error type for iodiag operations.
//!
//! Variants are grouped by the failure taxonomy: checkpoint/input errors
//! (fatal to a diagnosis run), lookup errors from a misconfigured boundary
//! map, and unsupported-format errors from output configuration. None of
//! these are retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IodiagError {
    #[error("checkpoint directory {} does not exist", .0.display())]
    CheckpointMissing(PathBuf),

    #[error("checkpoint path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("checkpoint directory {} is empty", .0.display())]
    EmptyCheckpoint(PathBuf),

    #[error("checkpoint directory {} does not contain any raw stats files", .0.display())]
    MissingRawStats(PathBuf),

    #[error("checkpoint directory {} does not contain any flat view files", .0.display())]
    MissingFlatViews(PathBuf),

    #[error("boundary references unknown metric column `{0}`")]
    UnknownBoundaryMetric(String),

    #[error("boundary references non-numeric column `{0}`")]
    NonNumericBoundaryMetric(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown output sink: {0}")]
    UnknownSink(String),
}
