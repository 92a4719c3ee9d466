use serde::{Deserialize, Serialize};

/// Physical storage for one column of a [`MetricTable`].
///
/// `Float` uses NaN as its null sentinel, matching the convention of the
/// measurement pipeline that produces the flat views. `Int` and `Text` carry
/// explicit nulls; score columns are always `Int` with values 0-5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Values {
    Float(Vec<f64>),
    Int(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Float(v) => v.len(),
            Values::Int(v) => v.len(),
            Values::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether cells of this column can be viewed as f64.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Values::Text(_))
    }

    /// Numeric view of one cell. `None` for null cells (NaN floats, missing
    /// ints) and for every cell of a text column.
    pub fn as_f64(&self, row: usize) -> Option<f64> {
        match self {
            Values::Float(v) => v.get(row).copied().filter(|x| !x.is_nan()),
            Values::Int(v) => v.get(row).copied().flatten().map(|x| x as f64),
            Values::Text(_) => None,
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Values::Float(v) => v.get(row).is_none_or(|x| x.is_nan()),
            Values::Int(v) => v.get(row).is_none_or(|x| x.is_none()),
            Values::Text(v) => v.get(row).is_none_or(|x| x.is_none()),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Values,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Values) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, Values::Float(values))
    }

    pub fn int(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, Values::Int(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, Values::Text(values))
    }
}

/// An ordered collection of equal-length named columns plus a stable row
/// index. The scorer treats tables as immutable: it only ever produces new
/// tables, never mutates one it was handed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    index: Vec<u64>,
    columns: Vec<Column>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with the default `0..n` row index.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let rows = columns.first().map_or(0, |c| c.values.len());
        Self::with_index((0..rows as u64).collect(), columns)
    }

    /// Build a table with an explicit row index. All columns must have the
    /// same length as the index.
    pub fn with_index(index: Vec<u64>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        Self { index, columns }
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.index.is_empty()
    }

    pub fn index(&self) -> &[u64] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn push_column(&mut self, column: Column) {
        debug_assert_eq!(column.values.len(), self.index.len());
        self.columns.push(column);
    }

    /// Reorder columns into ascending lexicographic order by name.
    pub fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_f64_treats_nan_as_null() {
        let values = Values::Float(vec![0.5, f64::NAN]);
        assert_eq!(values.as_f64(0), Some(0.5));
        assert_eq!(values.as_f64(1), None);
        assert!(values.is_null(1));
    }

    #[test]
    fn as_f64_widens_ints() {
        let values = Values::Int(vec![Some(3), None]);
        assert_eq!(values.as_f64(0), Some(3.0));
        assert_eq!(values.as_f64(1), None);
    }

    #[test]
    fn text_columns_are_not_numeric() {
        let values = Values::Text(vec![Some("gpu0".into())]);
        assert!(!values.is_numeric());
        assert_eq!(values.as_f64(0), None);
    }

    #[test]
    fn from_columns_assigns_sequential_index() {
        let table = MetricTable::from_columns(vec![Column::float("cpu_pct", vec![0.1, 0.2])]);
        assert_eq!(table.index(), &[0, 1]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 1);
    }

    #[test]
    fn sort_columns_is_lexicographic() {
        let mut table = MetricTable::from_columns(vec![
            Column::float("z_pct", vec![0.1]),
            Column::text("d_label", vec![None]),
            Column::float("a_pct", vec![0.2]),
        ]);
        table.sort_columns();
        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec!["a_pct", "d_label", "z_pct"]);
    }

    #[test]
    fn empty_checks() {
        assert!(MetricTable::new().is_empty());
        let no_rows = MetricTable::from_columns(vec![Column::float("cpu_pct", vec![])]);
        assert!(no_rows.is_empty());
    }
}
