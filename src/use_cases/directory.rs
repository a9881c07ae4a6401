// Country directory: loaded once per instance, read-only thereafter.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::domain::CountryTable;
use crate::domain::errors::DirectoryLoadError;
use crate::domain::ports::CountryDataSource;

/// Lazily loaded, cached mapping from country code to centroid record.
///
/// The first successful [`load`](Self::load) fetches the dataset; later calls return the
/// same shared table without touching the source. A failed load is not cached.
pub struct CountryDirectory {
    source: Box<dyn CountryDataSource>,
    table: OnceCell<Arc<CountryTable>>,
}

impl CountryDirectory {
    pub fn new(source: Box<dyn CountryDataSource>) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> Result<Arc<CountryTable>, DirectoryLoadError> {
        let table = self
            .table
            .get_or_try_init(|| async {
                let origin = self.source.describe();
                let table = self.source.fetch().await.inspect_err(|e| {
                    error!(%origin, error = %e, "country dataset load failed");
                })?;
                info!(%origin, countries = table.len(), "country dataset loaded");
                Ok::<_, DirectoryLoadError>(Arc::new(table))
            })
            .await?;

        Ok(Arc::clone(table))
    }

    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }
}
