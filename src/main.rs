use anyhow::Result;
use clap::Parser;
use iodiag::cli::{Cli, Commands};
use iodiag::commands::{self, DiagnoseConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Diagnose {
            checkpoint_dir,
            sink,
            format,
            output_dir,
            boundaries,
            config,
        } => commands::handle_diagnose(DiagnoseConfig {
            checkpoint_dir,
            sink,
            format,
            output_dir,
            boundaries,
            config,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
