use std::sync::Arc;

use async_trait::async_trait;

use super::batched::{BatchedCatalog, GraphqlSource};
use super::cache::LoaderVersionCache;
use super::direct::DirectCatalog;
use super::model::LoaderVersion;
use crate::core::error::SetupResult;
use crate::core::instance::LoaderType;
use crate::core::state::PolicyProvider;

/// Anything able to list loader versions for a game version.
#[async_trait]
pub trait LoaderCatalog: Send + Sync {
    async fn fetch(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> SetupResult<Vec<LoaderVersion>>;
}

/// Production dispatcher without Box<dyn>; the strategy is picked once from policy.
pub enum LoaderSource {
    Batched(BatchedCatalog),
    Direct(DirectCatalog),
}

impl LoaderSource {
    pub fn from_policy(policy: Arc<dyn PolicyProvider>, client: reqwest::Client) -> Self {
        if policy.use_batched_catalog() {
            let cache = LoaderVersionCache::new(policy.catalog_freshness());
            let source = GraphqlSource::new(client, policy.graphql_endpoint());
            Self::Batched(BatchedCatalog::new(Arc::new(source), cache, policy))
        } else {
            Self::Direct(DirectCatalog::new(client))
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            LoaderSource::Batched(_) => "batched",
            LoaderSource::Direct(_) => "direct",
        }
    }
}

#[async_trait]
impl LoaderCatalog for LoaderSource {
    async fn fetch(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> SetupResult<Vec<LoaderVersion>> {
        match self {
            LoaderSource::Batched(c) => c.fetch(loader, minecraft_version).await,
            LoaderSource::Direct(c) => c.fetch(loader, minecraft_version).await,
        }
    }
}
