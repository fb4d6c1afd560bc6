use serde::Deserialize;
use tracing::debug;

use super::model::LoaderVersion;
use crate::core::error::SetupResult;
use crate::core::http::ensure_success;

const FABRIC_META_BASE: &str = "https://meta.fabricmc.net/v2";
const LEGACY_FABRIC_META_BASE: &str = "https://meta.legacyfabric.net/v2";

/// `/versions/loader/<mc>` entry shared by the Fabric, Legacy Fabric and Quilt metas.
#[derive(Debug, Deserialize)]
pub(crate) struct MetaLoaderEntry {
    loader: MetaLoaderVersion,
}

#[derive(Debug, Deserialize)]
struct MetaLoaderVersion {
    version: String,
}

pub(crate) fn parse_meta_entries(body: &str, loader_name: &str) -> SetupResult<Vec<LoaderVersion>> {
    let entries: Vec<MetaLoaderEntry> = serde_json::from_str(body)?;

    Ok(entries
        .into_iter()
        .map(|entry| LoaderVersion::new(entry.loader.version, false, loader_name))
        .collect())
}

pub(crate) async fn fetch_meta_versions(
    client: &reqwest::Client,
    base: &str,
    minecraft_version: &str,
    loader_name: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    let url = format!("{}/versions/loader/{}", base, minecraft_version);
    debug!("Fetching {} loader versions from {}", loader_name, url);

    let resp = client.get(&url).send().await?;
    let body = ensure_success(resp, &format!("{} Meta", loader_name))?
        .text()
        .await?;

    parse_meta_entries(&body, loader_name)
}

/// Fetch available Fabric loader versions for a Minecraft version.
pub async fn list_loader_versions(
    client: &reqwest::Client,
    minecraft_version: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    fetch_meta_versions(client, FABRIC_META_BASE, minecraft_version, "Fabric").await
}

/// Fetch available Legacy Fabric loader versions for a Minecraft version.
pub async fn list_legacy_loader_versions(
    client: &reqwest::Client,
    minecraft_version: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    fetch_meta_versions(client, LEGACY_FABRIC_META_BASE, minecraft_version, "LegacyFabric").await
}
