//! Core table definitions and the repository contract.

use std::collections::HashSet;

use ndarray::{Array1, Array2, Axis};

use crate::common::error::{CrashError, CrashResult};

/// Storage of a single column. Missing cells are `None`.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Named, typed column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn missing(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Copy of this column containing only the given rows, in that order.
    pub fn take(&self, rows: &[usize]) -> Self {
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(rows.iter().map(|&r| v[r].clone()).collect())
            }
        };
        Self {
            name: self.name.clone(),
            data,
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// In-memory table as loaded or derived by a pipeline stage.
///
/// Columns always have equal length and unique names.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: usize,
    fingerprint: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> CrashResult<Self> {
        let name = name.into();
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for col in &columns {
            if col.len() != rows {
                return Err(CrashError::schema(format!(
                    "table `{name}`: column `{}` has {} rows, expected {rows}",
                    col.name,
                    col.len()
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(CrashError::schema(format!(
                    "table `{name}`: duplicate column `{}`",
                    col.name
                )));
            }
        }
        Ok(Self {
            name,
            columns,
            rows,
            fingerprint: None,
        })
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Repository contract for fetching raw tables by dataset name.
pub trait TableRepo {
    fn fetch(&self, name: &str) -> CrashResult<Table>;

    /// Human readable location of a dataset, used in logs.
    fn locate(&self, name: &str) -> String;
}

/// Fully numeric design matrix plus class labels, ready for fitting.
#[derive(Clone, Debug)]
pub struct FeatureSet {
    /// Feature column names in matrix column order.
    pub names: Vec<String>,
    pub x: Array2<f64>,
    pub y: Array1<usize>,
}

impl FeatureSet {
    pub fn new(names: Vec<String>, x: Array2<f64>, y: Array1<usize>) -> CrashResult<Self> {
        if x.nrows() != y.len() {
            return Err(CrashError::schema(format!(
                "feature matrix has {} rows but target has {}",
                x.nrows(),
                y.len()
            )));
        }
        if x.ncols() != names.len() {
            return Err(CrashError::schema(format!(
                "feature matrix has {} columns but {} names",
                x.ncols(),
                names.len()
            )));
        }
        Ok(Self { names, x, y })
    }

    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    /// Rows at the given indices, in that order.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            x: self.x.select(Axis(0), rows),
            y: self.y.select(Axis(0), rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_ragged_and_duplicate_columns() {
        let ragged = Table::new(
            "t",
            vec![
                Column::numeric("a", vec![Some(1.0), Some(2.0)]),
                Column::numeric("b", vec![Some(1.0)]),
            ],
        );
        assert!(ragged.is_err());

        let dup = Table::new(
            "t",
            vec![
                Column::numeric("a", vec![Some(1.0)]),
                Column::categorical("a", vec![Some("x")]),
            ],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn take_reorders_rows() {
        let col = Column::categorical("c", vec![Some("a"), None, Some("c")]);
        let taken = col.take(&[2, 0, 2]);
        assert_eq!(
            taken.data,
            ColumnData::Categorical(vec![Some("c".into()), Some("a".into()), Some("c".into())])
        );
        assert_eq!(col.missing(), 1);
    }

    #[test]
    fn feature_set_select_keeps_alignment() {
        let fs = FeatureSet::new(
            vec!["f".into()],
            array![[10.0], [20.0], [30.0]],
            array![0, 1, 0],
        )
        .unwrap();
        let sub = fs.select(&[1, 2]);
        assert_eq!(sub.x, array![[20.0], [30.0]]);
        assert_eq!(sub.y, array![1, 0]);
    }

    #[test]
    fn feature_set_rejects_misaligned_target() {
        let fs = FeatureSet::new(vec!["f".into()], array![[1.0], [2.0]], array![0]);
        assert!(fs.is_err());
    }
}
