//! Columnar binary form: the table serialized whole with postcard. Compact,
//! lossless (NaN bit patterns included), not intended for human eyes.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

use crate::core::table::MetricTable;

pub fn write_table(table: &MetricTable, path: &Path) -> Result<()> {
    let bytes =
        postcard::to_allocvec(table).map_err(|e| anyhow!("failed to encode table: {e}"))?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_table(path: &Path) -> Result<MetricTable> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    postcard::from_bytes(&bytes).map_err(|e| anyhow!("failed to decode table: {e}"))
}
