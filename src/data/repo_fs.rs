//! Filesystem-backed table repository.

use std::fs;
use std::path::PathBuf;

use crate::common::error::{CrashError, CrashResult};

use super::domain::{Table, TableRepo};
use super::service::parse_csv;

/// Resolves `<prefix><name>.csv` on the local filesystem.
///
/// The prefix is concatenated verbatim, so a directory prefix needs its
/// trailing separator.
pub struct FsTableRepo {
    prefix: String,
}

impl FsTableRepo {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn dataset_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{name}.csv", self.prefix))
    }
}

impl TableRepo for FsTableRepo {
    fn fetch(&self, name: &str) -> CrashResult<Table> {
        let path = self.dataset_path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => return Err(CrashError::load(name, format!("{}: {e}", path.display()))),
        };
        parse_csv(name, &bytes)
    }

    fn locate(&self, name: &str) -> String {
        self.dataset_path(name).display().to_string()
    }
}
