//! Join & clean stage: relational join, mean imputation, dummy encoding and
//! target extraction. Each step takes a table by reference and returns a new
//! one.

use std::collections::{BTreeSet, HashMap};

use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::common::error::{CrashError, CrashResult};

use super::domain::{Column, ColumnData, FeatureSet, Table};

/// Suffixes for non-key columns present in both joined tables.
const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Column names controlling the join and the prediction target.
#[derive(Clone, Debug)]
pub struct PrepCfg {
    pub key: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum KeyValue {
    Number(u64),
    Text(String),
}

fn number_text(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Join keys per row. Numeric keys compare by value unless `textual` forces
/// both sides onto their textual form.
fn key_values(col: &Column, textual: bool) -> Vec<Option<KeyValue>> {
    match &col.data {
        ColumnData::Numeric(values) => values
            .iter()
            .map(|v| {
                v.map(|v| {
                    if textual {
                        KeyValue::Text(number_text(v))
                    } else {
                        // +0.0 folds -0.0 onto 0.0
                        KeyValue::Number((v + 0.0).to_bits())
                    }
                })
            })
            .collect(),
        ColumnData::Categorical(values) => values
            .iter()
            .map(|v| v.clone().map(KeyValue::Text))
            .collect(),
    }
}

fn key_column<'a>(table: &'a Table, key: &str) -> CrashResult<&'a Column> {
    let Some(col) = table.column(key) else {
        let msg = format!("join key `{key}` missing from table `{}`", table.name());
        return Err(CrashError::schema(msg));
    };
    Ok(col)
}

/// Inner join on `key`.
///
/// Duplicate keys produce the cross product of matches. Output rows follow
/// left row order, then right match order. Rows with a missing key never
/// match. The key column appears once (taken from the left table); other
/// shared column names get `_x`/`_y` suffixes.
pub fn inner_join(left: &Table, right: &Table, key: &str) -> CrashResult<Table> {
    let left_key = key_column(left, key)?;
    let right_key = key_column(right, key)?;
    let textual = left_key.kind() != right_key.kind();

    let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
    for (row, value) in key_values(right_key, textual).into_iter().enumerate() {
        if let Some(value) = value {
            index.entry(value).or_default().push(row);
        }
    }

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (row, value) in key_values(left_key, textual).iter().enumerate() {
        let Some(matches) = value.as_ref().and_then(|v| index.get(v)) else {
            continue;
        };
        for &other in matches {
            left_rows.push(row);
            right_rows.push(other);
        }
    }

    let shared: BTreeSet<&str> = left
        .column_names()
        .into_iter()
        .filter(|name| *name != key && right.column(name).is_some())
        .collect();

    let mut columns = Vec::with_capacity(left.n_cols() + right.n_cols() - 1);
    for col in left.columns() {
        let taken = col.take(&left_rows);
        if shared.contains(col.name.as_str()) {
            columns.push(taken.renamed(format!("{}{LEFT_SUFFIX}", col.name)));
        } else {
            columns.push(taken);
        }
    }
    for col in right.columns().iter().filter(|c| c.name != key) {
        let taken = col.take(&right_rows);
        if shared.contains(col.name.as_str()) {
            columns.push(taken.renamed(format!("{}{RIGHT_SUFFIX}", col.name)));
        } else {
            columns.push(taken);
        }
    }

    let joined = Table::new(format!("{}_{}", left.name(), right.name()), columns)?;
    info!(
        left = left.name(),
        right = right.name(),
        left_rows = left.n_rows(),
        right_rows = right.n_rows(),
        rows = joined.n_rows(),
        cols = joined.n_cols(),
        "tables joined"
    );
    Ok(joined)
}

/// Replace missing numeric cells with the column mean over this table.
///
/// A numeric column with missing cells and no present value has no mean and
/// is rejected. Categorical columns pass through unchanged.
pub fn impute_means(table: &Table) -> CrashResult<Table> {
    let mut columns = Vec::with_capacity(table.n_cols());
    for col in table.columns() {
        let ColumnData::Numeric(values) = &col.data else {
            columns.push(col.clone());
            continue;
        };
        let missing = col.missing();
        if missing == 0 {
            columns.push(col.clone());
            continue;
        }
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(CrashError::numeric(format!(
                "column `{}` has no values to compute a mean from",
                col.name
            )));
        }
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        if !mean.is_finite() {
            return Err(CrashError::numeric(format!(
                "column `{}` has a non-finite mean",
                col.name
            )));
        }
        debug!(column = %col.name, missing, mean, "imputed missing values");
        columns.push(Column::numeric(
            col.name.clone(),
            values.iter().map(|v| Some(v.unwrap_or(mean))).collect(),
        ));
    }
    Table::new(table.name(), columns)
}

/// Expand every categorical column into 0/1 indicator columns.
///
/// One indicator per distinct value in ascending order, the first value
/// dropped. A missing cell encodes as all zeros. Numeric columns keep their
/// order and come first; indicators follow in source column order.
pub fn encode_dummies(table: &Table) -> CrashResult<Table> {
    let mut numeric = Vec::new();
    let mut dummies = Vec::new();
    for col in table.columns() {
        let values = match &col.data {
            ColumnData::Numeric(_) => {
                numeric.push(col.clone());
                continue;
            }
            ColumnData::Categorical(values) => values,
        };
        let levels: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
        for level in levels.into_iter().skip(1) {
            let indicator = values
                .iter()
                .map(|v| indicator(v.as_deref() == Some(level)))
                .collect();
            dummies.push(Column::numeric(format!("{}_{level}", col.name), indicator));
        }
    }
    numeric.extend(dummies);
    Table::new(table.name(), numeric)
}

fn indicator(hit: bool) -> Option<f64> {
    Some(if hit { 1.0 } else { 0.0 })
}

/// Split a fully numeric table into features and integer class labels.
pub fn extract_target(table: &Table, target: &str) -> CrashResult<FeatureSet> {
    let Some(target_col) = table.column(target) else {
        let msg = format!("target column `{target}` not present after encoding");
        return Err(CrashError::schema(msg));
    };
    let ColumnData::Numeric(target_values) = &target_col.data else {
        return Err(CrashError::schema(format!(
            "target column `{target}` is not numeric"
        )));
    };
    let labels = target_values
        .iter()
        .map(|v| match v {
            Some(v) if *v >= 0.0 && v.fract() == 0.0 => Ok(*v as usize),
            Some(v) => Err(CrashError::schema(format!(
                "target `{target}` must be binary-coded, found {v}"
            ))),
            None => Err(CrashError::numeric(format!(
                "target `{target}` has missing values"
            ))),
        })
        .collect::<CrashResult<Vec<usize>>>()?;

    let features: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.name != target)
        .collect();
    let mut x = Array2::<f64>::zeros((table.n_rows(), features.len()));
    for (j, col) in features.iter().enumerate() {
        let ColumnData::Numeric(values) = &col.data else {
            return Err(CrashError::schema(format!(
                "feature column `{}` is not numeric",
                col.name
            )));
        };
        for (i, v) in values.iter().enumerate() {
            let Some(v) = *v else {
                let msg = format!("feature `{}` still has missing values", col.name);
                return Err(CrashError::numeric(msg));
            };
            x[[i, j]] = v;
        }
    }

    FeatureSet::new(
        features.iter().map(|c| c.name.clone()).collect(),
        x,
        Array1::from(labels),
    )
}

/// Join, impute, encode and extract the target in one go.
pub fn prepare(left: &Table, right: &Table, cfg: &PrepCfg) -> CrashResult<FeatureSet> {
    let joined = inner_join(left, right, &cfg.key)?;
    let imputed = impute_means(&joined)?;
    let encoded = encode_dummies(&imputed)?;
    let features = extract_target(&encoded, &cfg.target)?;
    info!(
        rows = features.n_rows(),
        features = features.names.len(),
        target = %cfg.target,
        "feature matrix ready"
    );
    Ok(features)
}
