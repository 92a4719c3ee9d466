//! Row-oriented JSON form: a top-level object keyed by row key, each row an
//! object of column name -> cell value, null cells as JSON null.

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

use crate::core::table::{Column, MetricTable, Values};

pub fn write_table(table: &MetricTable, path: &Path) -> Result<()> {
    let mut rows = Map::new();
    for (row, key) in table.index().iter().enumerate() {
        let mut cells = Map::new();
        for column in table.columns() {
            cells.insert(column.name.clone(), cell_value(&column.values, row));
        }
        rows.insert(key.to_string(), Value::Object(cells));
    }
    let text = serde_json::to_string_pretty(&Value::Object(rows))?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_table(path: &Path) -> Result<MetricTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let root: Map<String, Value> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    // JSON object key order is not significant; rows are ordered by their
    // numeric keys.
    let mut rows: Vec<(u64, &Map<String, Value>)> = Vec::with_capacity(root.len());
    for (key, value) in &root {
        let key = key
            .parse::<u64>()
            .with_context(|| format!("non-numeric row key `{key}` in {}", path.display()))?;
        let cells = value
            .as_object()
            .ok_or_else(|| anyhow!("row `{key}` in {} is not an object", path.display()))?;
        rows.push((key, cells));
    }
    rows.sort_by_key(|(key, _)| *key);

    let mut names: Vec<String> = Vec::new();
    for (_, cells) in &rows {
        for name in cells.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }

    let index: Vec<u64> = rows.iter().map(|(key, _)| *key).collect();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let cells: Vec<&Value> = rows
            .iter()
            .map(|(_, row)| row.get(&name).unwrap_or(&Value::Null))
            .collect();
        columns.push(Column::new(name, infer_values(&cells)?));
    }

    Ok(MetricTable::with_index(index, columns))
}

fn cell_value(values: &Values, row: usize) -> Value {
    match values {
        Values::Float(v) => {
            let x = v[row];
            Number::from_f64(x).map_or(Value::Null, Value::Number)
        }
        Values::Int(v) => v[row].map_or(Value::Null, |x| Value::Number(x.into())),
        Values::Text(v) => v[row].clone().map_or(Value::Null, Value::String),
    }
}

/// Column-type inference mirroring the CSV reader: Int, then Float, then
/// Text; JSON nulls are null under every type.
fn infer_values(cells: &[&Value]) -> Result<Values> {
    if cells.iter().all(|v| v.is_null() || v.as_i64().is_some()) {
        Ok(Values::Int(cells.iter().map(|v| v.as_i64()).collect()))
    } else if cells.iter().all(|v| v.is_null() || v.as_f64().is_some()) {
        Ok(Values::Float(
            cells
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect(),
        ))
    } else if cells.iter().all(|v| v.is_null() || v.is_string()) {
        Ok(Values::Text(
            cells
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect(),
        ))
    } else {
        Err(anyhow!("unsupported cell type in JSON table"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");
        let table = MetricTable::from_columns(vec![
            Column::float("cpu_pct", vec![0.1, 0.5]),
            Column::int("cpu_pct_score", vec![Some(1), None]),
            Column::text("d_label", vec![Some("rank0".into()), None]),
        ]);
        write_table(&table, &path).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn rows_are_keyed_by_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");
        let table = MetricTable::with_index(
            vec![7, 9],
            vec![Column::float("mem_per", vec![0.2, 0.6])],
        );
        write_table(&table, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let root: Map<String, Value> = serde_json::from_str(&text).unwrap();
        assert!(root.contains_key("7"));
        assert!(root.contains_key("9"));

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.index(), &[7, 9]);
    }

    #[test]
    fn row_order_survives_double_digit_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");
        let index: Vec<u64> = (0..12).collect();
        let values: Vec<f64> = (0..12).map(|i| i as f64 / 12.0).collect();
        let table =
            MetricTable::with_index(index.clone(), vec![Column::float("cpu_pct", values)]);
        write_table(&table, &path).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.index(), index.as_slice());
    }

    #[test]
    fn null_cells_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");
        let table = MetricTable::from_columns(vec![Column::int(
            "bw_mean_score",
            vec![Some(2), None, Some(0)],
        )]);
        write_table(&table, &path).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, table);
    }
}
