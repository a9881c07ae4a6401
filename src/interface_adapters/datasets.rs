// Country dataset sources: compiled-in, local file, or remote URL.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::CountryTable;
use crate::domain::errors::DirectoryLoadError;
use crate::domain::ports::CountryDataSource;
use crate::interface_adapters::protocol::parse_country_dataset;

const EMBEDDED_COUNTRIES: &str = include_str!("../../data/countries.json");

#[derive(Clone, Copy, Default)]
pub struct EmbeddedDataset;

#[async_trait]
impl CountryDataSource for EmbeddedDataset {
    async fn fetch(&self) -> Result<CountryTable, DirectoryLoadError> {
        parse_country_dataset(EMBEDDED_COUNTRIES)
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}

#[derive(Clone)]
pub struct FileDataset {
    pub path: PathBuf,
}

#[async_trait]
impl CountryDataSource for FileDataset {
    async fn fetch(&self) -> Result<CountryTable, DirectoryLoadError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DirectoryLoadError::Fetch(format!("{}: {e}", self.path.display())))?;
        parse_country_dataset(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Clone)]
pub struct HttpDataset {
    http: reqwest::Client,
    url: String,
}

impl HttpDataset {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CountryDataSource for HttpDataset {
    async fn fetch(&self) -> Result<CountryTable, DirectoryLoadError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DirectoryLoadError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryLoadError::Fetch(format!("upstream status {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DirectoryLoadError::Fetch(e.to_string()))?;
        parse_country_dataset(&text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
