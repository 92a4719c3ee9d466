use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::output::{FileFormat, OutputKind};

#[derive(Parser, Debug)]
#[command(name = "iodiag")]
#[command(about = "Distributed-training I/O checkpoint diagnoser", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the metrics of a checkpoint's flat views
    Diagnose {
        /// Checkpoint directory containing raw stats and flat view files
        checkpoint_dir: PathBuf,

        /// Where scored results go
        #[arg(long, value_enum)]
        sink: Option<SinkArg>,

        /// File output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Directory for scored files (defaults to next to each flat view)
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,

        /// Metric boundary override, NAME=VALUE (repeatable)
        #[arg(long = "boundary", value_name = "NAME=VALUE", value_parser = parse_boundary)]
        boundaries: Vec<(String, f64)>,

        /// Config file path (defaults to .iodiag.toml in the working directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a default .iodiag.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SinkArg {
    Console,
    File,
}

impl From<SinkArg> for OutputKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Console => OutputKind::Console,
            SinkArg::File => OutputKind::File,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    Binary,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => FileFormat::Json,
            FormatArg::Csv => FileFormat::Csv,
            FormatArg::Binary => FileFormat::Binary,
        }
    }
}

fn parse_boundary(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty metric name in `{s}`"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid boundary value in `{s}`"))?;
    Ok((name.to_string(), value))
}
