//! Delimited-text form: one record per row, row keys in a leading `index`
//! column, empty fields for null cells.

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::table::{Column, MetricTable, Values};

pub const INDEX_COLUMN: &str = "index";

pub fn write_table(table: &MetricTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header = vec![INDEX_COLUMN.to_string()];
    header.extend(table.columns().iter().map(|c| c.name.clone()));
    writer.write_record(&header)?;

    for (row, key) in table.index().iter().enumerate() {
        let mut record = vec![key.to_string()];
        for column in table.columns() {
            record.push(cell_to_string(&column.values, row));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_table(path: &Path) -> Result<MetricTable> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.with_context(|| format!("malformed record in {}", path.display()))?;
        for (col, field) in record.iter().enumerate() {
            if col < cells.len() {
                cells[col].push(field.to_string());
            }
        }
    }

    let mut index = None;
    let mut columns = Vec::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        if name == INDEX_COLUMN && index.is_none() {
            let keys = raw
                .iter()
                .map(|s| s.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("non-numeric row key in {}", path.display()))?;
            index = Some(keys);
        } else {
            columns.push(Column::new(name, infer_values(&raw)));
        }
    }

    Ok(match index {
        Some(index) => MetricTable::with_index(index, columns),
        None => MetricTable::from_columns(columns),
    })
}

fn cell_to_string(values: &Values, row: usize) -> String {
    match values {
        Values::Float(v) => {
            let x = v[row];
            if x.is_nan() {
                String::new()
            } else {
                format!("{x}")
            }
        }
        Values::Int(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        Values::Text(v) => v[row].clone().unwrap_or_default(),
    }
}

/// Column-type inference: Int, then Float, then Text. Empty fields are null
/// under every type.
fn infer_values(raw: &[String]) -> Values {
    if raw
        .iter()
        .all(|s| s.is_empty() || s.parse::<i64>().is_ok())
    {
        Values::Int(raw.iter().map(|s| s.parse().ok()).collect())
    } else if raw
        .iter()
        .all(|s| s.is_empty() || s.parse::<f64>().is_ok())
    {
        Values::Float(
            raw.iter()
                .map(|s| s.parse().unwrap_or(f64::NAN))
                .collect(),
        )
    } else {
        Values::Text(
            raw.iter()
                .map(|s| (!s.is_empty()).then(|| s.clone()))
                .collect(),
        )
    }
}
