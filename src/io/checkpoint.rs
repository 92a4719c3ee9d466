//! Checkpoint-directory discovery.
//!
//! A checkpoint is a flat directory holding one or more raw statistics
//! documents plus one or more flat views (tabular per-process samples).
//! Discovery is glob-based and non-recursive; results are sorted so a
//! diagnosis run is deterministic.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::IodiagError;

pub const RAW_STATS_PATTERN: &str = "_raw_stats_*.json";
pub const FLAT_VIEW_PATTERN: &str = "_flat_view_*.csv";

/// Checkpoint directories must exist, be directories, and be non-empty.
pub fn validate_checkpoint_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(IodiagError::CheckpointMissing(dir.to_path_buf()).into());
    }
    if !dir.is_dir() {
        return Err(IodiagError::NotADirectory(dir.to_path_buf()).into());
    }
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read checkpoint directory {}", dir.display()))?;
    if entries.next().is_none() {
        return Err(IodiagError::EmptyCheckpoint(dir.to_path_buf()).into());
    }
    Ok(())
}

pub fn find_raw_stats(dir: &Path) -> Result<Vec<PathBuf>> {
    let paths = glob_sorted(dir, RAW_STATS_PATTERN)?;
    if paths.is_empty() {
        return Err(IodiagError::MissingRawStats(dir.to_path_buf()).into());
    }
    Ok(paths)
}

pub fn find_flat_views(dir: &Path) -> Result<Vec<PathBuf>> {
    let paths = glob_sorted(dir, FLAT_VIEW_PATTERN)?;
    if paths.is_empty() {
        return Err(IodiagError::MissingFlatViews(dir.to_path_buf()).into());
    }
    Ok(paths)
}

fn glob_sorted(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let mut paths = glob::glob(&full)
        .with_context(|| format!("invalid glob pattern {full}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list {full}"))?;
    paths.sort();
    Ok(paths)
}
