// ─── Version Manifest ───
// Fetches and parses the Mojang version manifest v2, the game version
// catalog the setup session lists from.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::channel::Channel;
use crate::core::error::SetupResult;
use crate::core::http::ensure_success;

const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Release time of 1.2.5, the first version that shipped a server jar
/// alongside the client.
const FIRST_SERVER_RELEASE: &str = "2012-03-28T22:00:00+00:00";

/// Top-level Mojang version manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub channel: Channel,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionEntry {
    pub fn new(id: &str, channel: Channel, release_time: &str) -> Self {
        Self {
            id: id.to_string(),
            channel,
            release_time: release_time.to_string(),
            url: String::new(),
            sha1: None,
        }
    }

    pub fn released_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.release_time).ok()
    }

    /// Whether Mojang published a dedicated server for this version.
    pub fn has_server(&self) -> bool {
        let Some(released) = self.released_at() else {
            return false;
        };
        match DateTime::parse_from_rfc3339(FIRST_SERVER_RELEASE) {
            Ok(cutoff) => released > cutoff,
            Err(_) => false,
        }
    }
}

impl VersionManifest {
    /// Fetch the version manifest from Mojang using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client) -> SetupResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let resp = client.get(VERSION_MANIFEST_URL).send().await?;
        let manifest: VersionManifest = ensure_success(resp, "Mojang manifest")?.json().await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}
