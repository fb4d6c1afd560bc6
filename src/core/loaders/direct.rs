use async_trait::async_trait;
use tracing::info;

use super::catalog::LoaderCatalog;
use super::model::LoaderVersion;
use super::{fabric, forge, quilt};
use crate::core::error::SetupResult;
use crate::core::instance::LoaderType;

/// Strategy L: ask each loader's own metadata service directly.
pub struct DirectCatalog {
    client: reqwest::Client,
}

impl DirectCatalog {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoaderCatalog for DirectCatalog {
    async fn fetch(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> SetupResult<Vec<LoaderVersion>> {
        info!("Listing {} versions for Minecraft {}", loader, minecraft_version);

        match loader {
            LoaderType::Vanilla => Ok(Vec::new()),
            LoaderType::Fabric => fabric::list_loader_versions(&self.client, minecraft_version).await,
            LoaderType::LegacyFabric => {
                fabric::list_legacy_loader_versions(&self.client, minecraft_version).await
            }
            LoaderType::Quilt => quilt::list_loader_versions(&self.client, minecraft_version).await,
            LoaderType::Forge => forge::list_loader_versions(&self.client, minecraft_version).await,
        }
    }
}
