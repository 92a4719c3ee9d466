use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::cli::{FormatArg, SinkArg};
use crate::config;
use crate::core::table::Values;
use crate::core::{DiagnosisResult, MetricTable, ScoreBand};
use crate::diagnoser::Diagnoser;
use crate::io::output::{create_output, FileFormat, OutputKind};
use crate::scoring::BoundaryMap;

pub struct DiagnoseConfig {
    pub checkpoint_dir: PathBuf,
    pub sink: Option<SinkArg>,
    pub format: Option<FormatArg>,
    pub output_dir: Option<PathBuf>,
    pub boundaries: Vec<(String, f64)>,
    pub config: Option<PathBuf>,
}

pub fn handle_diagnose(config: DiagnoseConfig) -> Result<()> {
    let file_config = config::load_config(config.config.as_deref());

    // CLI flags override the config file, which overrides the defaults.
    let sink = match config.sink {
        Some(arg) => OutputKind::from(arg),
        None => match file_config.output.sink.as_deref() {
            Some(tag) => tag.parse::<OutputKind>()?,
            None => OutputKind::File,
        },
    };
    let format = match config.format {
        Some(arg) => FileFormat::from(arg),
        None => match file_config.output.format.as_deref() {
            Some(tag) => tag.parse::<FileFormat>()?,
            None => FileFormat::Json,
        },
    };
    let output_dir = config.output_dir.or(file_config.output.dir);

    let mut boundaries: BoundaryMap = file_config.boundaries;
    boundaries.extend(config.boundaries);

    let diagnoser = Diagnoser::new();
    let result = diagnoser.diagnose_checkpoint(&config.checkpoint_dir, &boundaries)?;

    let output = create_output(sink, output_dir, format);
    output.handle_result(&result)?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &DiagnosisResult) {
    for (path, table) in result
        .flat_view_paths
        .iter()
        .zip(&result.scored_flat_views)
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match worst_band(table) {
            Some((count, band)) => {
                let label = band.label();
                let label = match band {
                    ScoreBand::Critical | ScoreBand::BeyondCritical => label.red().bold(),
                    ScoreBand::High => label.yellow(),
                    _ => label.green(),
                };
                println!("{name}: {count} metrics scored, worst severity {label}");
            }
            None => println!("{name}: no metrics scored"),
        }
    }
}

/// Number of score columns and the highest band observed across them, if any
/// metric was scored at all.
fn worst_band(table: &MetricTable) -> Option<(usize, ScoreBand)> {
    let score_columns: Vec<_> = table
        .columns()
        .iter()
        .filter(|c| c.name.ends_with("_score"))
        .collect();
    let worst = score_columns
        .iter()
        .filter_map(|c| match &c.values {
            Values::Int(v) => v.iter().copied().flatten().max(),
            _ => None,
        })
        .max()?;
    Some((score_columns.len(), ScoreBand::from_level(worst as usize)))
}
