use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use super::model::LoaderVersion;
use crate::core::instance::LoaderType;

type CacheKey = (String, LoaderType);

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    versions: Vec<LoaderVersion>,
}

/// Session-wide loader version cache keyed by (game version, loader).
///
/// Clones share storage. Writes replace the whole entry for a key, so the
/// last successful fetch wins.
#[derive(Debug, Clone)]
pub struct LoaderVersionCache {
    freshness: Duration,
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl LoaderVersionCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cached versions younger than the freshness window.
    pub fn get_fresh(&self, minecraft_version: &str, loader: LoaderType) -> Option<Vec<LoaderVersion>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&(minecraft_version.to_string(), loader))?;
        if entry.stored_at.elapsed() > self.freshness {
            debug!("Cache entry for {} {} is stale", loader, minecraft_version);
            return None;
        }
        Some(entry.versions.clone())
    }

    pub fn insert(&self, minecraft_version: &str, loader: LoaderType, versions: Vec<LoaderVersion>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                (minecraft_version.to_string(), loader),
                CacheEntry {
                    stored_at: Instant::now(),
                    versions,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
