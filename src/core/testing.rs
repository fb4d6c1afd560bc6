// Shared fakes for the collaborator traits. Test builds only.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::core::error::{SetupError, SetupResult};
use crate::core::instance::{InstallExecutor, InstallRequest, LoaderType};
use crate::core::loaders::{LoaderCatalog, LoaderVersion};
use crate::core::version::{Channel, VersionEntry, VersionManifest};

type Gate = oneshot::Receiver<SetupResult<Vec<LoaderVersion>>>;
pub type GateSender = oneshot::Sender<SetupResult<Vec<LoaderVersion>>>;

/// Loader catalog whose fetches block until the test releases them.
#[derive(Default)]
pub struct GatedCatalog {
    gates: Mutex<HashMap<(String, LoaderType), VecDeque<Gate>>>,
    calls: AtomicUsize,
}

impl GatedCatalog {
    /// Queue a gate for the next fetch of this key. Call before triggering the fetch.
    pub fn gate(&self, minecraft_version: &str, loader: LoaderType) -> GateSender {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry((minecraft_version.to_string(), loader))
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoaderCatalog for GatedCatalog {
    async fn fetch(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> SetupResult<Vec<LoaderVersion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(&(minecraft_version.to_string(), loader))
            .and_then(VecDeque::pop_front);

        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SetupError::LoaderApi("gate dropped".into()))),
            None => Err(SetupError::LoaderApi(format!(
                "no gate for {} {}",
                loader, minecraft_version
            ))),
        }
    }
}

/// Executor that records requests and answers with a fixed outcome.
pub struct RecordingExecutor {
    pub requests: Mutex<Vec<InstallRequest>>,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl InstallExecutor for RecordingExecutor {
    async fn execute(&self, request: &InstallRequest) -> SetupResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(SetupError::Install(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn sample_manifest() -> VersionManifest {
    VersionManifest {
        versions: vec![
            VersionEntry::new("23w31a", Channel::Preview, "2023-08-01T11:03:42+00:00"),
            VersionEntry::new("1.20.1", Channel::Stable, "2023-06-12T13:25:51+00:00"),
            VersionEntry::new("1.19.4", Channel::Stable, "2023-03-14T12:56:18+00:00"),
            VersionEntry::new("1.4.7", Channel::Stable, "2012-12-27T22:00:00+00:00"),
            VersionEntry::new("1.2.4", Channel::Stable, "2012-03-21T22:00:00+00:00"),
            VersionEntry::new("b1.7.3", Channel::LegacyBeta, "2011-07-07T22:00:00+00:00"),
        ],
    }
}

pub fn forge_versions() -> Vec<LoaderVersion> {
    vec![
        LoaderVersion::new("47.1.3", false, "Forge"),
        LoaderVersion::new("47.1.0", true, "Forge"),
        LoaderVersion::new("47.0.3", false, "Forge"),
    ]
}

pub fn fabric_versions() -> Vec<LoaderVersion> {
    vec![
        LoaderVersion::new("0.14.22", false, "Fabric"),
        LoaderVersion::new("0.14.21", false, "Fabric"),
    ]
}
