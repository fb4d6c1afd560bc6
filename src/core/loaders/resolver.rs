// ─── Loader Resolver ───
// Turns (game version, loader) selections into loader version lists.
//
// Every request is stamped with a fresh generation. Fetches run on spawned
// tasks and report back over a channel; the owner feeds completions into
// `apply`, which drops anything not stamped with the current generation.
// In-flight requests are never cancelled, only outdated.

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::catalog::LoaderCatalog;
use super::model::{LoaderVersion, LoaderVersionChoice, Placeholder};
use crate::core::error::SetupResult;
use crate::core::instance::LoaderType;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStatus {
    /// No loader (or no game version) selected.
    #[default]
    Idle,
    Loading,
    Ready,
    Empty,
    Failed,
}

/// Result of one fetch, tagged with the generation that started it.
#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: u64,
    pub minecraft_version: String,
    pub loader: LoaderType,
    pub result: SetupResult<Vec<LoaderVersion>>,
}

/// What applying a completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Superseded by a newer request; nothing changed.
    Stale,
    /// The current request settled. `default_pick` is the version to pre-select.
    Settled {
        status: ResolverStatus,
        default_pick: Option<LoaderVersion>,
    },
}

pub struct LoaderResolver {
    catalog: Arc<dyn LoaderCatalog>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
    runtime: Option<Handle>,
    generation: u64,
    status: ResolverStatus,
    versions: Vec<LoaderVersion>,
}

impl LoaderResolver {
    pub fn new(
        catalog: Arc<dyn LoaderCatalog>,
        completions: mpsc::UnboundedSender<FetchCompletion>,
    ) -> Self {
        Self {
            catalog,
            completions,
            runtime: Handle::try_current().ok(),
            generation: 0,
            status: ResolverStatus::Idle,
            versions: Vec::new(),
        }
    }

    /// Spawn fetches on `runtime` instead of the one current at construction.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> ResolverStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ResolverStatus::Loading
    }

    /// Versions of the current request; empty unless `Ready`.
    pub fn versions(&self) -> &[LoaderVersion] {
        &self.versions
    }

    /// Exact version-string lookup in the current result set.
    pub fn find(&self, version: &str) -> Option<&LoaderVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Dropdown contents for the current state.
    pub fn choices(&self) -> Vec<LoaderVersionChoice> {
        match self.status {
            ResolverStatus::Idle => vec![LoaderVersionChoice::from(Placeholder::SelectLoaderFirst)],
            ResolverStatus::Loading => vec![LoaderVersionChoice::from(Placeholder::Loading)],
            ResolverStatus::Empty => vec![LoaderVersionChoice::from(Placeholder::NoVersionsFound)],
            ResolverStatus::Failed => vec![LoaderVersionChoice::from(Placeholder::Error)],
            ResolverStatus::Ready => self
                .versions
                .iter()
                .cloned()
                .map(LoaderVersionChoice::Version)
                .collect(),
        }
    }

    /// Starts resolution for a new selection and returns its generation.
    ///
    /// Without a game version, or with `Vanilla`, the resolver goes `Idle`;
    /// the generation still advances so older fetches are discarded.
    pub fn request(&mut self, minecraft_version: Option<&str>, loader: LoaderType) -> u64 {
        self.generation += 1;
        self.versions.clear();

        let minecraft_version = match minecraft_version {
            Some(version) if !loader.is_vanilla() => version.to_string(),
            _ => {
                self.status = ResolverStatus::Idle;
                return self.generation;
            }
        };

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            error!(
                "No Tokio runtime to resolve {} versions for Minecraft {} on",
                loader, minecraft_version
            );
            self.status = ResolverStatus::Failed;
            return self.generation;
        };

        self.status = ResolverStatus::Loading;
        let generation = self.generation;
        debug!(
            "Resolving {} versions for Minecraft {} (generation {})",
            loader, minecraft_version, generation
        );

        let catalog = Arc::clone(&self.catalog);
        let completions = self.completions.clone();
        runtime.spawn(async move {
            let result = catalog.fetch(loader, &minecraft_version).await;
            // Err only when the session was dropped.
            let _ = completions.send(FetchCompletion {
                generation,
                minecraft_version,
                loader,
                result,
            });
        });

        generation
    }

    pub fn apply(&mut self, completion: FetchCompletion) -> Applied {
        if completion.generation != self.generation {
            debug!(
                "Dropping stale {} versions for Minecraft {} (generation {}, current {})",
                completion.loader,
                completion.minecraft_version,
                completion.generation,
                self.generation
            );
            return Applied::Stale;
        }

        match completion.result {
            Ok(versions) if versions.is_empty() => {
                info!(
                    "No {} versions for Minecraft {}",
                    completion.loader, completion.minecraft_version
                );
                self.status = ResolverStatus::Empty;
                self.versions.clear();
            }
            Ok(versions) => {
                info!(
                    "Loaded {} {} versions for Minecraft {}",
                    versions.len(),
                    completion.loader,
                    completion.minecraft_version
                );
                self.status = ResolverStatus::Ready;
                self.versions = versions;
            }
            Err(err) => {
                error!(
                    "Error fetching {} versions for Minecraft {}: {}",
                    completion.loader, completion.minecraft_version, err
                );
                self.status = ResolverStatus::Failed;
                self.versions.clear();
            }
        }

        Applied::Settled {
            status: self.status,
            default_pick: self.default_pick().cloned(),
        }
    }

    /// Recommended entry if the backend flagged one, otherwise the first.
    fn default_pick(&self) -> Option<&LoaderVersion> {
        self.versions
            .iter()
            .find(|v| v.recommended)
            .or_else(|| self.versions.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SetupError;
    use crate::core::testing::{fabric_versions, forge_versions, GatedCatalog};

    fn resolver(
        catalog: Arc<GatedCatalog>,
    ) -> (LoaderResolver, mpsc::UnboundedReceiver<FetchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (LoaderResolver::new(catalog, tx), rx)
    }

    #[tokio::test]
    async fn vanilla_or_missing_version_stays_idle() {
        let catalog = Arc::new(GatedCatalog::default());
        let (mut resolver, _rx) = resolver(catalog.clone());

        resolver.request(Some("1.20.1"), LoaderType::Vanilla);
        assert_eq!(resolver.status(), ResolverStatus::Idle);
        resolver.request(None, LoaderType::Forge);
        assert_eq!(resolver.status(), ResolverStatus::Idle);

        assert_eq!(resolver.generation(), 2);
        assert_eq!(resolver.choices(), vec![LoaderVersionChoice::from(Placeholder::SelectLoaderFirst)]);
        tokio::task::yield_now().await;
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn ready_preselects_recommended_entry() {
        let catalog = Arc::new(GatedCatalog::default());
        let gate = catalog.gate("1.20.1", LoaderType::Forge);
        let (mut resolver, mut rx) = resolver(catalog);

        resolver.request(Some("1.20.1"), LoaderType::Forge);
        assert!(resolver.is_loading());
        assert_eq!(resolver.choices(), vec![LoaderVersionChoice::from(Placeholder::Loading)]);

        gate.send(Ok(forge_versions())).unwrap();
        let applied = resolver.apply(rx.recv().await.unwrap());

        assert_eq!(
            applied,
            Applied::Settled {
                status: ResolverStatus::Ready,
                default_pick: Some(LoaderVersion::new("47.1.0", true, "Forge")),
            }
        );
        assert_eq!(resolver.versions().len(), 3);
        assert_eq!(resolver.choices().len(), 3);
        assert!(resolver.find("47.0.3").is_some());
        assert!(resolver.find("47.0").is_none());
    }

    #[tokio::test]
    async fn without_recommended_the_first_entry_is_picked() {
        let catalog = Arc::new(GatedCatalog::default());
        let gate = catalog.gate("1.20.1", LoaderType::Fabric);
        let (mut resolver, mut rx) = resolver(catalog);

        resolver.request(Some("1.20.1"), LoaderType::Fabric);
        gate.send(Ok(fabric_versions())).unwrap();

        match resolver.apply(rx.recv().await.unwrap()) {
            Applied::Settled { default_pick, .. } => {
                assert_eq!(default_pick.unwrap().version, "0.14.22")
            }
            Applied::Stale => panic!("current generation must apply"),
        }
    }

    #[tokio::test]
    async fn empty_and_failed_results_show_placeholders() {
        let catalog = Arc::new(GatedCatalog::default());
        let empty = catalog.gate("1.20.1", LoaderType::Quilt);
        let failing = catalog.gate("1.20.1", LoaderType::Fabric);
        let (mut resolver, mut rx) = resolver(catalog);

        resolver.request(Some("1.20.1"), LoaderType::Quilt);
        empty.send(Ok(vec![])).unwrap();
        resolver.apply(rx.recv().await.unwrap());
        assert_eq!(resolver.status(), ResolverStatus::Empty);
        assert_eq!(resolver.choices(), vec![LoaderVersionChoice::from(Placeholder::NoVersionsFound)]);

        resolver.request(Some("1.20.1"), LoaderType::Fabric);
        failing
            .send(Err(SetupError::LoaderApi("Fabric Meta returned 503".into())))
            .unwrap();
        let applied = resolver.apply(rx.recv().await.unwrap());
        assert_eq!(
            applied,
            Applied::Settled {
                status: ResolverStatus::Failed,
                default_pick: None,
            }
        );
        assert_eq!(resolver.choices(), vec![LoaderVersionChoice::from(Placeholder::Error)]);
    }

    #[tokio::test]
    async fn older_generation_never_overwrites_newer_state() {
        let catalog = Arc::new(GatedCatalog::default());
        let fabric = catalog.gate("1.20.1", LoaderType::Fabric);
        let forge = catalog.gate("1.20.1", LoaderType::Forge);
        let (mut resolver, mut rx) = resolver(catalog);

        let first = resolver.request(Some("1.20.1"), LoaderType::Fabric);
        let second = resolver.request(Some("1.20.1"), LoaderType::Forge);
        assert!(second > first);

        forge.send(Ok(forge_versions())).unwrap();
        resolver.apply(rx.recv().await.unwrap());
        assert_eq!(resolver.status(), ResolverStatus::Ready);

        fabric.send(Err(SetupError::LoaderApi("late".into()))).unwrap();
        let late = rx.recv().await.unwrap();
        assert_eq!(late.generation, first);
        assert_eq!(resolver.apply(late), Applied::Stale);

        assert_eq!(resolver.status(), ResolverStatus::Ready);
        assert_eq!(resolver.versions()[0].loader, "Forge");
    }

    #[test]
    fn request_without_runtime_fails_instead_of_panicking() {
        let catalog = Arc::new(GatedCatalog::default());
        let (mut resolver, _rx) = resolver(catalog.clone());

        resolver.request(Some("1.20.1"), LoaderType::Fabric);

        assert_eq!(resolver.status(), ResolverStatus::Failed);
        assert_eq!(resolver.choices(), vec![LoaderVersionChoice::from(Placeholder::Error)]);
        assert_eq!(catalog.calls(), 0);
    }

    #[test]
    fn fetches_run_on_the_supplied_runtime_from_sync_code() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let catalog = Arc::new(GatedCatalog::default());
        let gate = catalog.gate("1.20.1", LoaderType::Forge);
        let (resolver, mut rx) = resolver(catalog);
        let mut resolver = resolver.with_runtime(rt.handle().clone());

        resolver.request(Some("1.20.1"), LoaderType::Forge);
        assert!(resolver.is_loading());

        gate.send(Ok(forge_versions())).unwrap();
        let completion = rt.block_on(rx.recv()).unwrap();
        resolver.apply(completion);

        assert_eq!(resolver.status(), ResolverStatus::Ready);
    }

    #[tokio::test]
    async fn switching_to_vanilla_discards_in_flight_fetch() {
        let catalog = Arc::new(GatedCatalog::default());
        let gate = catalog.gate("1.20.1", LoaderType::Fabric);
        let (mut resolver, mut rx) = resolver(catalog);

        resolver.request(Some("1.20.1"), LoaderType::Fabric);
        resolver.request(Some("1.20.1"), LoaderType::Vanilla);

        gate.send(Ok(fabric_versions())).unwrap();
        assert_eq!(resolver.apply(rx.recv().await.unwrap()), Applied::Stale);
        assert_eq!(resolver.status(), ResolverStatus::Idle);
    }
}
