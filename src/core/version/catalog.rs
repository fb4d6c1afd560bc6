use std::collections::BTreeSet;

use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use super::channel::Channel;
use super::manifest::{VersionEntry, VersionManifest};

/// Snapshot of every known game version, in catalog order.
pub trait GameVersionCatalog: Send + Sync {
    fn versions(&self) -> &[VersionEntry];

    fn has_server_artifact(&self, entry: &VersionEntry) -> bool {
        entry.has_server()
    }

    fn find(&self, id: &str) -> Option<&VersionEntry> {
        self.versions().iter().find(|v| v.id == id)
    }
}

impl GameVersionCatalog for VersionManifest {
    fn versions(&self) -> &[VersionEntry] {
        &self.versions
    }
}

/// One row of the version table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionRow {
    pub id: String,
    /// Release date rendered with the policy's date format.
    pub released: String,
    pub channel: Channel,
}

/// Filtered, presentation-ready listing over a [`GameVersionCatalog`].
pub struct GameVersionCatalogView<'a> {
    catalog: &'a dyn GameVersionCatalog,
    date_format: &'a str,
}

impl<'a> GameVersionCatalogView<'a> {
    pub fn new(catalog: &'a dyn GameVersionCatalog, date_format: &'a str) -> Self {
        Self {
            catalog,
            date_format,
        }
    }

    /// Entries of the given channels, catalog order preserved. Demo builds are skipped.
    pub fn list(&self, channels: &BTreeSet<Channel>) -> Vec<&'a VersionEntry> {
        self.catalog
            .versions()
            .iter()
            .filter(|entry| channels.contains(&entry.channel))
            .filter(|entry| !entry.id.to_ascii_lowercase().contains("demo"))
            .collect()
    }

    pub fn rows(&self, channels: &BTreeSet<Channel>) -> Vec<VersionRow> {
        self.list(channels)
            .into_iter()
            .map(|entry| VersionRow {
                id: entry.id.clone(),
                released: self.format_release(entry),
                channel: entry.channel,
            })
            .collect()
    }

    fn format_release(&self, entry: &VersionEntry) -> String {
        let items = StrftimeItems::new(self.date_format);
        if items.clone().any(|item| matches!(item, Item::Error)) {
            return entry.release_time.clone();
        }
        match entry.released_at() {
            Some(released) => released.format_with_items(items).to_string(),
            None => entry.release_time.clone(),
        }
    }
}
