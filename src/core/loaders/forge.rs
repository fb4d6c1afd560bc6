use std::collections::HashMap;

use futures_util::future::try_join;
use serde::Deserialize;
use tracing::debug;

use super::model::LoaderVersion;
use crate::core::error::SetupResult;
use crate::core::http::ensure_success;
use crate::core::version::compare::newest_first;

const FORGE_MAVEN_METADATA: &str =
    "https://maven.minecraftforge.net/net/minecraftforge/forge/maven-metadata.xml";
const FORGE_PROMOTIONS: &str =
    "https://files.minecraftforge.net/net/minecraftforge/forge/promotions_slim.json";

#[derive(Debug, Deserialize)]
struct MavenMetadata {
    versioning: MavenVersioning,
}

#[derive(Debug, Deserialize)]
struct MavenVersioning {
    versions: MavenVersions,
}

#[derive(Debug, Deserialize)]
struct MavenVersions {
    #[serde(rename = "version", default)]
    version: Vec<String>,
}

/// `promotions_slim.json`: `"<mc>-recommended"` / `"<mc>-latest"` → forge version.
#[derive(Debug, Default, Deserialize)]
struct ForgePromotions {
    #[serde(default)]
    promos: HashMap<String, String>,
}

impl ForgePromotions {
    fn recommended_for(&self, minecraft_version: &str) -> Option<&str> {
        self.promos
            .get(&format!("{}-recommended", minecraft_version))
            .map(String::as_str)
    }
}

/// Builds Forge versions for one game version from the maven listing,
/// newest first, flagging the promoted recommended build.
fn versions_for(
    metadata_xml: &str,
    promotions_json: &str,
    minecraft_version: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    let metadata: MavenMetadata = quick_xml::de::from_str(metadata_xml)?;
    let promotions: ForgePromotions = serde_json::from_str(promotions_json)?;
    let recommended = promotions.recommended_for(minecraft_version);
    let prefix = format!("{}-", minecraft_version);
    // Legacy branches also carry the game version as a suffix: 1.7.10-10.13.4.1614-1.7.10
    let suffix = format!("-{}", minecraft_version);

    let mut versions: Vec<LoaderVersion> = metadata
        .versioning
        .versions
        .version
        .into_iter()
        .filter_map(|raw| {
            let short = raw.strip_prefix(&prefix)?;
            let short = short.strip_suffix(&suffix).unwrap_or(short).to_owned();
            let is_recommended = recommended == Some(short.as_str());
            Some(LoaderVersion::new(short, is_recommended, "Forge").with_raw_version(raw))
        })
        .collect();

    versions.sort_by(|a, b| newest_first(&a.version, &b.version));
    versions.dedup_by(|a, b| a.version == b.version);

    Ok(versions)
}

async fn fetch_text(client: &reqwest::Client, url: &str, source: &str) -> SetupResult<String> {
    let resp = client.get(url).send().await?;
    Ok(ensure_success(resp, source)?.text().await?)
}

/// Fetch available Forge versions for a Minecraft version.
pub async fn list_loader_versions(
    client: &reqwest::Client,
    minecraft_version: &str,
) -> SetupResult<Vec<LoaderVersion>> {
    debug!("Fetching Forge versions for Minecraft {}", minecraft_version);

    let (metadata, promotions) = try_join(
        fetch_text(client, FORGE_MAVEN_METADATA, "Forge maven"),
        fetch_text(client, FORGE_PROMOTIONS, "Forge promotions"),
    )
    .await?;

    versions_for(&metadata, &promotions, minecraft_version)
}
