use super::fabric::fetch_meta_versions;
use super::model::LoaderVersion;
use crate::core::error::SetupResult;

/// Quilt Meta mirrors Fabric's loader listing under its own base URL.
const QUILT_META_BASE: &str = "https://meta.quiltmc.org/v3";

/// Fetch available Quilt loader versions for a Minecraft version.
pub async fn list_loader_versions(
    client: &reqwest::Client,
    minecraft_version: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    fetch_meta_versions(client, QUILT_META_BASE, minecraft_version, "Quilt").await
}
