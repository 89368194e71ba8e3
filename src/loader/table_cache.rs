use crate::loader::data_loader::DataLoader;
use crate::loader::data_source::DataSource;
use crate::loader::error::LoadError;
use crate::types::normalized_table::NormalizedTable;
use log::{info, warn};
use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Memoizes normalized tables by source.
///
/// The first [`TableCache::get`] for a source reads, parses and normalizes it;
/// later calls return the same shared table without touching the source again
/// until it is removed with [`TableCache::invalidate`] or [`TableCache::clear`].
pub struct TableCache {
    loader: DataLoader,
    tables: Mutex<HashMap<DataSource, Arc<NormalizedTable>>>,
}

impl TableCache {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the normalized table for `source`, loading it on a cache miss.
    pub async fn get(&self, source: &DataSource) -> Result<Arc<NormalizedTable>, LoadError> {
        {
            let tables = self.tables.lock().await;
            if let Some(table) = tables.get(source) {
                info!("Cache hit for {}", source);
                return Ok(Arc::clone(table));
            }
        }

        // Loading happens outside the lock
        warn!("Cache miss for {}. Loading and normalizing.", source);
        let loaded = Arc::new(self.loader.load(source).await?);

        let mut tables = self.tables.lock().await;
        match tables.entry(source.clone()) {
            // Another caller finished first; keep its table
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    /// Drops the cached table for `source`. Returns whether one was cached.
    pub async fn invalidate(&self, source: &DataSource) -> bool {
        let removed = self.tables.lock().await.remove(source).is_some();
        if removed {
            info!("Invalidated cached table for {}", source);
        }
        removed
    }

    pub async fn clear(&self) {
        self.tables.lock().await.clear();
    }

    pub async fn contains(&self, source: &DataSource) -> bool {
        self.tables.lock().await.contains_key(source)
    }
}
