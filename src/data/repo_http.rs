//! HTTP-backed table repository.

use reqwest::blocking::Client;

use crate::common::error::{CrashError, CrashResult};

use super::domain::{Table, TableRepo};
use super::service::parse_csv;

/// Fetches `<base_url><name>.csv` with a blocking GET. No caching: every
/// call goes to the network.
pub struct HttpTableRepo {
    base_url: String,
    client: Client,
}

impl HttpTableRepo {
    pub fn new(base_url: impl Into<String>) -> CrashResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("crash-severity/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrashError::config(format!("http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn dataset_url(&self, name: &str) -> String {
        format!("{}{name}.csv", self.base_url)
    }
}

impl TableRepo for HttpTableRepo {
    fn fetch(&self, name: &str) -> CrashResult<Table> {
        let url = self.dataset_url(name);
        let bytes = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| CrashError::load(name, e))?;
        parse_csv(name, &bytes)
    }

    fn locate(&self, name: &str) -> String {
        self.dataset_url(name)
    }
}
