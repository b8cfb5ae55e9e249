//! Data source client: fetch the dataset document
//!
//! Every call performs a full fetch. Nothing is cached between calls.

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_dataset(&self) -> Result<Dataset>;

    /// Where the data comes from, for log lines
    fn describe(&self) -> String;
}

/// GET the document from a URL.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, None)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_dataset(&self) -> Result<Dataset> {
        debug!(url = %self.url, "fetching dataset");
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "dataset received");
        Ok(Dataset::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Read the document from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch_dataset(&self) -> Result<Dataset> {
        debug!(path = %self.path.display(), "reading dataset");
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(Dataset::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source named by the config: the file when one is set, the URL otherwise.
pub fn from_config(config: &DashboardConfig) -> Result<Box<dyn DataSource>> {
    match &config.dataset_file {
        Some(path) => Ok(Box::new(FileSource::new(path.clone()))),
        None => Ok(Box::new(HttpSource::with_timeout(
            config.dataset_url.clone(),
            config.timeout(),
        )?)),
    }
}
