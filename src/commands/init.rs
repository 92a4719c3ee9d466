use anyhow::Result;
use std::path::PathBuf;

use crate::config::CONFIG_FILE_NAME;
use crate::io;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# iodiag configuration

# Scale values used to turn absolute metrics into relative percentages
# before severity banding. Metrics listed here must exist in the flat views.
[boundaries]
# bw_mean = 125000000.0

[output]
sink = "file"      # "console" | "file"
format = "json"    # "json" | "csv" | "binary"
# dir = "scored"   # defaults to writing next to each flat view
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
