//! Output sinks for diagnosis results.
//!
//! Sinks form a fixed, closed set behind the [`Output`] trait: a console
//! sink and a file sink. [`create_output`] is the registry mapping a
//! configuration tag to a constructor; nothing here is reflected or
//! dynamically discovered.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::DiagnosisResult;
use crate::errors::IodiagError;
use crate::io::writers;

/// On-disk format for scored flat views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
    Binary,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
            FileFormat::Binary => "bin",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
            FileFormat::Binary => "binary",
        };
        write!(f, "{name}")
    }
}

impl FromStr for FileFormat {
    type Err = IodiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(FileFormat::Json),
            "csv" => Ok(FileFormat::Csv),
            "binary" => Ok(FileFormat::Binary),
            other => Err(IodiagError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Which sink to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Console,
    File,
}

impl FromStr for OutputKind {
    type Err = IodiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(OutputKind::Console),
            "file" => Ok(OutputKind::File),
            other => Err(IodiagError::UnknownSink(other.to_string())),
        }
    }
}

pub trait Output {
    fn handle_result(&self, result: &DiagnosisResult) -> Result<()>;
}

/// Placeholder sink: the scored views stay in memory only.
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn handle_result(&self, result: &DiagnosisResult) -> Result<()> {
        log::debug!(
            "console sink received {} scored flat views",
            result.scored_flat_views.len()
        );
        Ok(())
    }
}

/// Writes each scored flat view to `<source-basename>_scored.<ext>`, either
/// into `output_dir` or next to the source file when no directory is set.
pub struct FileOutput {
    output_dir: Option<PathBuf>,
    format: FileFormat,
}

impl FileOutput {
    pub fn new(output_dir: Option<PathBuf>, format: FileFormat) -> Self {
        Self { output_dir, format }
    }

    pub fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = format!("{stem}_scored.{}", self.format.extension());
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => source.with_file_name(file_name),
        }
    }
}

impl Output for FileOutput {
    fn handle_result(&self, result: &DiagnosisResult) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            crate::io::ensure_dir(dir)?;
        }
        for (source, table) in result
            .flat_view_paths
            .iter()
            .zip(&result.scored_flat_views)
        {
            let path = self.output_path(source);
            match self.format {
                FileFormat::Json => writers::json::write_table(table, &path),
                FileFormat::Csv => writers::csv::write_table(table, &path),
                FileFormat::Binary => writers::binary::write_table(table, &path),
            }
            .with_context(|| format!("failed to write scored view {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        Ok(())
    }
}

/// Sink registry: tag in, boxed sink out.
pub fn create_output(
    kind: OutputKind,
    output_dir: Option<PathBuf>,
    format: FileFormat,
) -> Box<dyn Output> {
    match kind {
        OutputKind::Console => Box::new(ConsoleOutput),
        OutputKind::File => Box::new(FileOutput::new(output_dir, format)),
    }
}
