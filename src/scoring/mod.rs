//! Severity scoring for metric tables.
//!
//! This is the decision core of the crate: a pure transform from a table of
//! raw metric columns (plus optional caller-supplied boundaries) to the same
//! table augmented with one `<metric>_score` column per recognized metric.
//! Everything else in the crate is plumbing around this function.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::core::table::{Column, MetricTable, Values};
use crate::core::ScoreBand;
use crate::errors::IodiagError;

/// Metric name -> scale value used to normalize an absolute metric into a
/// relative percentage before banding. BTreeMap keeps the boundary pass
/// deterministic regardless of caller insertion order.
pub type BoundaryMap = BTreeMap<String, f64>;

/// Columns with this prefix are descriptive dimensions, never metrics.
pub const DESCRIPTIVE_PREFIX: &str = "d_";

const SCORE_SUFFIX: &str = "_score";

/// Breakpoints for fraction-valued metrics in [0, 1].
pub const PERCENTAGE_BINS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 0.9];

/// Tangents of 15, 30, 45, 60, 75 degrees. Computed rather than written as
/// literals: tan(45 deg) lands one ulp below 1.0 in f64, and a raw slope of
/// exactly 1.0 must band above that breakpoint.
pub static SLOPE_BINS: Lazy<[f64; 5]> =
    Lazy::new(|| [15.0f64, 30.0, 45.0, 60.0, 75.0].map(|deg| deg.to_radians().tan()));

/// Geometric sequence from 2^-30 up to 2^-10, ratio 2^5.
pub static INTENSITY_BINS: Lazy<[f64; 5]> =
    Lazy::new(|| std::array::from_fn(|i| 2f64.powi(-30 + 5 * i as i32)));

/// Metric family, classified by column-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    /// `_pct` / `_per` / `_util`; `_util` values are inverted before banding
    /// (high utilization means low severity).
    Percentage { invert: bool },
    /// `_slope`
    Slope,
    /// `_intensity_mean`
    Intensity,
}

impl Family {
    fn bins(self) -> &'static [f64; 5] {
        match self {
            Family::Percentage { .. } => &PERCENTAGE_BINS,
            Family::Slope => &SLOPE_BINS,
            Family::Intensity => &INTENSITY_BINS,
        }
    }
}

fn classify(name: &str) -> Option<Family> {
    if name.ends_with("_pct") || name.ends_with("_per") {
        Some(Family::Percentage { invert: false })
    } else if name.ends_with("_util") {
        Some(Family::Percentage { invert: true })
    } else if name.ends_with("_slope") {
        Some(Family::Slope)
    } else if name.ends_with("_intensity_mean") {
        Some(Family::Intensity)
    } else {
        None
    }
}

/// Right-inclusive banding: the number of breakpoints strictly below `value`,
/// so a value equal to a breakpoint falls into the band on its left and
/// values above the last breakpoint band to 5. NaN must not reach the binary
/// search and short-circuits to `None`.
fn band(bins: &[f64; 5], value: f64) -> Option<ScoreBand> {
    if value.is_nan() {
        return None;
    }
    Some(ScoreBand::from_level(
        bins.partition_point(|b| *b < value),
    ))
}

fn score_column<F>(values: &Values, rows: usize, transform: F) -> Vec<Option<i64>>
where
    F: Fn(f64) -> Option<ScoreBand>,
{
    (0..rows)
        .map(|row| values.as_f64(row).and_then(&transform).map(ScoreBand::level))
        .collect()
}

/// Score every recognized metric column of `table`.
///
/// Family scoring is driven by column-name suffix; boundary scoring is driven
/// by the keys of `boundaries` and runs second, so a boundary-derived score
/// takes precedence over a family-derived score of the same name. Score
/// columns are appended and the full column set is re-sorted
/// lexicographically; the row index is preserved untouched. A table with no
/// recognized metrics (or no rows) passes through unchanged.
///
/// The only failure modes are lookup errors: a boundary key naming a column
/// that is absent from the table, or one that is not numeric.
pub fn score_metrics(
    table: &MetricTable,
    boundaries: &BoundaryMap,
) -> Result<MetricTable, IodiagError> {
    if table.is_empty() {
        return Ok(table.clone());
    }

    let rows = table.n_rows();
    let mut score_cols: BTreeMap<String, Vec<Option<i64>>> = BTreeMap::new();

    for column in table.columns() {
        if column.name.starts_with(DESCRIPTIVE_PREFIX) || !column.values.is_numeric() {
            continue;
        }
        let Some(family) = classify(&column.name) else {
            continue;
        };
        let scores = score_column(&column.values, rows, |raw| {
            let value = match family {
                Family::Percentage { invert: true } => 1.0 - raw,
                _ => raw,
            };
            band(family.bins(), value)
        });
        score_cols.insert(format!("{}{}", column.name, SCORE_SUFFIX), scores);
    }

    for (metric, boundary) in boundaries {
        let column = table
            .column(metric)
            .ok_or_else(|| IodiagError::UnknownBoundaryMetric(metric.clone()))?;
        if !column.values.is_numeric() {
            return Err(IodiagError::NonNumericBoundaryMetric(metric.clone()));
        }
        let invert = metric.contains("bw_mean");
        let scores = score_column(&column.values, rows, |raw| {
            let mut relative = raw / boundary;
            if invert {
                relative = 1.0 - relative;
            }
            band(&PERCENTAGE_BINS, relative)
        });
        score_cols.insert(format!("{}{}", metric, SCORE_SUFFIX), scores);
    }

    if score_cols.is_empty() {
        return Ok(table.clone());
    }

    let mut scored = table.clone();
    for (name, values) in score_cols {
        scored.push_column(Column::int(name, values));
    }
    scored.sort_columns();
    Ok(scored)
}
