//! Dataset loading: CSV decoding with type inference and catalogue fetching.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::common::error::{CrashError, CrashResult};
use crate::common::ids::Fingerprint;
use crate::common::time::Stopwatch;

use super::domain::{Column, ColumnData, Table, TableRepo};
use super::repo_fs::FsTableRepo;
use super::repo_http::HttpTableRepo;

/// Cell spellings treated as missing, besides the empty string.
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL"];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

fn parse_number(cell: &str) -> Option<f64> {
    if cell.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    cell.parse::<f64>().ok()
}

/// Decode CSV bytes into a typed table.
///
/// A column is numeric when every present cell parses as a number (booleans
/// count as 0/1), otherwise categorical.
pub fn parse_csv(name: &str, bytes: &[u8]) -> CrashResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CrashError::load(name, e))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(CrashError::load(name, "no header row"));
    }

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| CrashError::load(name, e))?;
        for (cells, cell) in raw.iter_mut().zip(record.iter()) {
            cells.push((!is_missing(cell)).then(|| cell.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(header, cells)| infer_column(header, cells))
        .collect();

    Table::new(name, columns)
        .map_err(|e| CrashError::load(name, e))
        .map(|t| t.with_fingerprint(Fingerprint::of(bytes).to_hex()))
}

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let numeric: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => parse_number(text).map(Some),
        })
        .collect();

    match numeric {
        Some(values) => Column {
            name,
            data: ColumnData::Numeric(values),
        },
        None => Column {
            name,
            data: ColumnData::Categorical(cells),
        },
    }
}

/// Pick the repository matching a source string: HTTP(S) URLs are fetched
/// over the network, anything else is a filesystem prefix.
pub fn repo_for(source: &str) -> CrashResult<Box<dyn TableRepo>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpTableRepo::new(source)?))
    } else {
        Ok(Box::new(FsTableRepo::new(source)))
    }
}

/// Fetch every named dataset, failing on the first one that cannot be loaded.
pub fn load_tables(
    repo: &dyn TableRepo,
    datasets: &[String],
) -> CrashResult<BTreeMap<String, Table>> {
    let mut tables = BTreeMap::new();
    for name in datasets {
        let watch = Stopwatch::start();
        debug!(dataset = %name, location = %repo.locate(name), "fetching dataset");
        let table = repo.fetch(name)?;
        info!(
            dataset = %name,
            rows = table.n_rows(),
            cols = table.n_cols(),
            fingerprint = table.fingerprint().unwrap_or("-"),
            dur_ms = watch.elapsed_ms() as u64,
            "dataset loaded"
        );
        tables.insert(name.clone(), table);
    }
    Ok(tables)
}
