//! Core data model: metric tables, severity bands, diagnosis results.

pub mod table;

pub use table::{Column, MetricTable, Values};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ordinal severity of a scored metric value.
///
/// Bands 0-4 correspond to the five threshold bins; `BeyondCritical` is the
/// implicit sixth band for values above the last breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Trivial,
    Low,
    Medium,
    High,
    Critical,
    BeyondCritical,
}

impl ScoreBand {
    /// Band for a bin count; counts above the last bin saturate to
    /// `BeyondCritical`.
    pub fn from_level(level: usize) -> Self {
        match level {
            0 => ScoreBand::Trivial,
            1 => ScoreBand::Low,
            2 => ScoreBand::Medium,
            3 => ScoreBand::High,
            4 => ScoreBand::Critical,
            _ => ScoreBand::BeyondCritical,
        }
    }

    pub fn level(self) -> i64 {
        match self {
            ScoreBand::Trivial => 0,
            ScoreBand::Low => 1,
            ScoreBand::Medium => 2,
            ScoreBand::High => 3,
            ScoreBand::Critical => 4,
            ScoreBand::BeyondCritical => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Trivial => "trivial",
            ScoreBand::Low => "low",
            ScoreBand::Medium => "medium",
            ScoreBand::High => "high",
            ScoreBand::Critical => "critical",
            ScoreBand::BeyondCritical => "beyond critical",
        }
    }
}

/// Outcome of diagnosing one checkpoint directory: every flat view that was
/// found, paired positionally with its scored table.
#[derive(Debug, Clone)]
pub struct DiagnosisResult {
    pub flat_view_paths: Vec<PathBuf>,
    pub scored_flat_views: Vec<MetricTable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_levels_round_trip() {
        for level in 0..=5 {
            assert_eq!(ScoreBand::from_level(level).level(), level as i64);
        }
    }

    #[test]
    fn band_saturates_beyond_critical() {
        assert_eq!(ScoreBand::from_level(9), ScoreBand::BeyondCritical);
    }

    #[test]
    fn band_ordering_matches_severity() {
        assert!(ScoreBand::Trivial < ScoreBand::Low);
        assert!(ScoreBand::Critical < ScoreBand::BeyondCritical);
    }
}
