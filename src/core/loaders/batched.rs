// ─── Batched loader catalog ───
// One GraphQL call returns every loader family for a game version. Results
// are cached per (game version, loader) for the policy's freshness window and
// filtered client-side against the policy's disabled loader versions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::cache::LoaderVersionCache;
use super::catalog::LoaderCatalog;
use super::model::LoaderVersion;
use crate::core::error::{SetupError, SetupResult};
use crate::core::http::ensure_success;
use crate::core::instance::LoaderType;
use crate::core::state::PolicyProvider;

const LOADER_VERSIONS_QUERY: &str = r#"query GetLoaderVersionsForMinecraftVersion($minecraftVersion: String!) {
  loaderVersions(minecraftVersion: $minecraftVersion) {
    fabric { version }
    forge {
      version
      rawVersion
      recommended
      installerSha1Hash
      installerSize
      universalSha1Hash
      universalSize
      clientSha1Hash
      clientSize
      serverSha1Hash
      serverSize
    }
    legacyfabric { version }
    quilt { version }
  }
}"#;

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleLoaderEntry {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeLoaderEntry {
    pub version: String,
    pub raw_version: Option<String>,
    #[serde(default)]
    pub recommended: bool,
    pub installer_sha1_hash: Option<String>,
    pub installer_size: Option<u64>,
    pub universal_sha1_hash: Option<String>,
    pub universal_size: Option<u64>,
    pub client_sha1_hash: Option<String>,
    pub client_size: Option<u64>,
    pub server_sha1_hash: Option<String>,
    pub server_size: Option<u64>,
}

impl ForgeLoaderEntry {
    fn into_loader_version(self) -> LoaderVersion {
        let mut lv = LoaderVersion::new(self.version, self.recommended, "Forge");
        lv.raw_version = self.raw_version;
        lv.add_artifact("installer", self.installer_sha1_hash, self.installer_size);
        lv.add_artifact("universal", self.universal_sha1_hash, self.universal_size);
        lv.add_artifact("client", self.client_sha1_hash, self.client_size);
        lv.add_artifact("server", self.server_sha1_hash, self.server_size);
        lv
    }
}

/// Every loader family for one game version, as the batched endpoint returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoaderVersionsPayload {
    #[serde(default)]
    pub fabric: Vec<SimpleLoaderEntry>,
    #[serde(default)]
    pub forge: Vec<ForgeLoaderEntry>,
    #[serde(default)]
    pub legacyfabric: Vec<SimpleLoaderEntry>,
    #[serde(default)]
    pub quilt: Vec<SimpleLoaderEntry>,
}

impl LoaderVersionsPayload {
    /// Splits the payload into per-loader lists, in backend order.
    pub fn into_families(self) -> Vec<(LoaderType, Vec<LoaderVersion>)> {
        let simple = |entries: Vec<SimpleLoaderEntry>, name: &str| -> Vec<LoaderVersion> {
            entries
                .into_iter()
                .map(|e| LoaderVersion::new(e.version, false, name))
                .collect()
        };

        vec![
            (LoaderType::Fabric, simple(self.fabric, "Fabric")),
            (
                LoaderType::Forge,
                self.forge
                    .into_iter()
                    .map(ForgeLoaderEntry::into_loader_version)
                    .collect(),
            ),
            (LoaderType::LegacyFabric, simple(self.legacyfabric, "LegacyFabric")),
            (LoaderType::Quilt, simple(self.quilt, "Quilt")),
        ]
    }
}

/// Transport for the batched query.
#[async_trait]
pub trait BatchedSource: Send + Sync {
    async fn fetch_all(&self, minecraft_version: &str) -> SetupResult<LoaderVersionsPayload>;
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlData {
    loader_versions: LoaderVersionsPayload,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// `BatchedSource` over the launcher API's GraphQL endpoint.
pub struct GraphqlSource {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn parse(body: &str) -> SetupResult<LoaderVersionsPayload> {
        let response: GraphqlResponse = serde_json::from_str(body)?;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(SetupError::Graphql(messages.join("; ")));
        }

        response
            .data
            .map(|d| d.loader_versions)
            .ok_or_else(|| SetupError::Graphql("response carried no data".into()))
    }
}

#[async_trait]
impl BatchedSource for GraphqlSource {
    async fn fetch_all(&self, minecraft_version: &str) -> SetupResult<LoaderVersionsPayload> {
        let body = json!({
            "operationName": "GetLoaderVersionsForMinecraftVersion",
            "query": LOADER_VERSIONS_QUERY,
            "variables": { "minecraftVersion": minecraft_version },
        });

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let text = ensure_success(resp, "Launcher GraphQL API")?.text().await?;

        Self::parse(&text)
    }
}

/// Strategy R: cache-first, one network round trip for all loader families.
pub struct BatchedCatalog {
    source: Arc<dyn BatchedSource>,
    cache: LoaderVersionCache,
    policy: Arc<dyn PolicyProvider>,
}

impl BatchedCatalog {
    pub fn new(
        source: Arc<dyn BatchedSource>,
        cache: LoaderVersionCache,
        policy: Arc<dyn PolicyProvider>,
    ) -> Self {
        Self {
            source,
            cache,
            policy,
        }
    }

    fn without_disabled(&self, loader: LoaderType, versions: Vec<LoaderVersion>) -> Vec<LoaderVersion> {
        let disabled = self.policy.disabled_loader_versions(loader);
        versions
            .into_iter()
            .filter(|v| !disabled.contains(&v.version))
            .collect()
    }
}

#[async_trait]
impl LoaderCatalog for BatchedCatalog {
    async fn fetch(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> SetupResult<Vec<LoaderVersion>> {
        if loader.is_vanilla() {
            return Ok(Vec::new());
        }

        if let Some(cached) = self.cache.get_fresh(minecraft_version, loader) {
            debug!("Serving {} versions for {} from cache", loader, minecraft_version);
            return Ok(self.without_disabled(loader, cached));
        }

        info!("Querying loader versions for Minecraft {}", minecraft_version);
        let payload = self.source.fetch_all(minecraft_version).await?;

        let mut requested = Vec::new();
        for (family, versions) in payload.into_families() {
            if family == loader {
                requested = versions.clone();
            }
            self.cache.insert(minecraft_version, family, versions);
        }

        Ok(self.without_disabled(loader, requested))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::core::state::LauncherPolicy;

    const SAMPLE: &str = r#"{
        "data": {
            "loaderVersions": {
                "fabric": [{"version": "0.14.22"}, {"version": "0.14.21"}],
                "forge": [{
                    "version": "47.1.0",
                    "rawVersion": "1.20.1-47.1.0",
                    "recommended": true,
                    "installerSha1Hash": "aaa",
                    "installerSize": 100,
                    "serverSha1Hash": "bbb",
                    "serverSize": null
                }],
                "legacyfabric": [],
                "quilt": [{"version": "0.19.2"}]
            }
        }
    }"#;

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BatchedSource for CountingSource {
        async fn fetch_all(&self, _minecraft_version: &str) -> SetupResult<LoaderVersionsPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            GraphqlSource::parse(SAMPLE)
        }
    }

    fn catalog(policy: LauncherPolicy) -> (BatchedCatalog, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let catalog = BatchedCatalog::new(
            source.clone(),
            LoaderVersionCache::new(Duration::from_secs(300)),
            Arc::new(policy),
        );
        (catalog, source)
    }

    #[test]
    fn parses_forge_artifacts_and_recommended_flag() {
        let families = GraphqlSource::parse(SAMPLE).unwrap().into_families();
        let (_, forge) = families
            .iter()
            .find(|(loader, _)| *loader == LoaderType::Forge)
            .unwrap();

        assert_eq!(forge.len(), 1);
        assert!(forge[0].recommended);
        assert_eq!(forge[0].raw_version.as_deref(), Some("1.20.1-47.1.0"));
        assert!(forge[0].artifacts.contains_key("installer"));
        assert!(!forge[0].artifacts.contains_key("server"));
    }

    #[test]
    fn graphql_errors_become_setup_errors() {
        let err = GraphqlSource::parse(r#"{"data": null, "errors": [{"message": "boom"}]}"#)
            .unwrap_err();
        assert!(matches!(err, SetupError::Graphql(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn one_query_serves_every_family_from_cache() {
        let (catalog, source) = catalog(LauncherPolicy::default());

        let fabric = catalog.fetch(LoaderType::Fabric, "1.20.1").await.unwrap();
        let quilt = catalog.fetch(LoaderType::Quilt, "1.20.1").await.unwrap();
        let fabric_again = catalog.fetch(LoaderType::Fabric, "1.20.1").await.unwrap();

        assert_eq!(fabric.len(), 2);
        assert_eq!(fabric[0].version, "0.14.22");
        assert_eq!(quilt[0].loader, "Quilt");
        assert_eq!(fabric, fabric_again);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_loader_versions_are_filtered_out() {
        let policy = LauncherPolicy::from_json(
            r#"{"loaders": {"fabric": {"disabledVersions": ["0.14.22"]}}}"#,
        )
        .unwrap();
        let (catalog, _) = catalog(policy);

        let fabric = catalog.fetch(LoaderType::Fabric, "1.20.1").await.unwrap();
        let cached = catalog.fetch(LoaderType::Fabric, "1.20.1").await.unwrap();

        assert_eq!(fabric.len(), 1);
        assert_eq!(fabric[0].version, "0.14.21");
        assert_eq!(cached, fabric);
    }

    #[tokio::test]
    async fn vanilla_never_queries() {
        let (catalog, source) = catalog(LauncherPolicy::default());

        assert!(catalog.fetch(LoaderType::Vanilla, "1.20.1").await.unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
