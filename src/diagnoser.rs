//! Checkpoint diagnosis: validate the directory, load the raw statistics
//! document, then load and score every flat view.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;

use crate::core::{DiagnosisResult, MetricTable};
use crate::io::checkpoint;
use crate::io::writers::csv;
use crate::scoring::{score_metrics, BoundaryMap};

#[derive(Debug, Default)]
pub struct Diagnoser;

impl Diagnoser {
    pub fn new() -> Self {
        Self
    }

    /// Diagnose one checkpoint directory. Flat views are independent tables,
    /// so they are loaded and scored in parallel; discovery order is
    /// preserved in the result.
    pub fn diagnose_checkpoint(
        &self,
        checkpoint_dir: &Path,
        boundaries: &BoundaryMap,
    ) -> Result<DiagnosisResult> {
        checkpoint::validate_checkpoint_dir(checkpoint_dir)?;

        log::info!("loading raw stats from {}", checkpoint_dir.display());
        let raw_stats_paths = checkpoint::find_raw_stats(checkpoint_dir)?;
        let raw_stats_path = &raw_stats_paths[0];
        let raw_stats = crate::io::read_file(raw_stats_path)?;
        let raw_stats: serde_json::Value = serde_json::from_str(&raw_stats)
            .with_context(|| format!("failed to parse raw stats {}", raw_stats_path.display()))?;
        log::debug!(
            "raw stats document {} has {} top-level entries",
            raw_stats_path.display(),
            raw_stats.as_object().map_or(0, |m| m.len())
        );

        let flat_view_paths = checkpoint::find_flat_views(checkpoint_dir)?;
        log::info!("scoring {} flat views", flat_view_paths.len());
        let scored_flat_views = flat_view_paths
            .par_iter()
            .map(|path| {
                let flat_view = csv::read_table(path)
                    .with_context(|| format!("failed to load flat view {}", path.display()))?;
                let scored = score_metrics(&flat_view, boundaries)
                    .with_context(|| format!("failed to score flat view {}", path.display()))?;
                Ok(scored)
            })
            .collect::<Result<Vec<MetricTable>>>()?;

        Ok(DiagnosisResult {
            flat_view_paths,
            scored_flat_views,
        })
    }
}
