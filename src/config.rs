//! `.iodiag.toml` loading.
//!
//! Configuration is optional: a missing file yields the defaults, a
//! malformed file warns and yields the defaults. Parsing is split into pure
//! functions so it can be tested without touching the filesystem.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::scoring::BoundaryMap;

pub const CONFIG_FILE_NAME: &str = ".iodiag.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IodiagConfig {
    /// Metric name -> scale value, merged under any CLI-provided boundaries.
    #[serde(default)]
    pub boundaries: BoundaryMap,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Output settings as written in the file. Sink and format stay strings here
/// and are parsed at command-assembly time so that a typo surfaces as an
/// unsupported-format/unknown-sink error naming the offending value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub sink: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Pure function to read config file contents.
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string.
pub fn parse_and_validate_config(contents: &str) -> Result<IodiagConfig, String> {
    let mut config = toml::from_str::<IodiagConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    // Non-finite boundaries would null out every score for that metric.
    let invalid: Vec<String> = config
        .boundaries
        .iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(name, _)| name.clone())
        .collect();
    for name in invalid {
        eprintln!("Warning: boundary `{name}` is not finite. Ignoring it.");
        config.boundaries.remove(&name);
    }

    Ok(config)
}

/// Try loading config from a specific path, warning and falling back to
/// `None` on any failure.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<IodiagConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            None
        }
    }
}

/// Load configuration from an explicit path, or `.iodiag.toml` in the
/// working directory, or fall back to defaults.
pub fn load_config(explicit: Option<&Path>) -> IodiagConfig {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    try_load_config_from_path(&path).unwrap_or_default()
}
