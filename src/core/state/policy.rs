use std::sync::RwLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{SetupError, SetupResult};
use crate::core::instance::LoaderType;
use crate::core::version::compare::is_at_most;
use crate::core::version::Channel;

const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.atlauncher.com/v2/graphql";
const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
const DEFAULT_FRESHNESS_SECS: u64 = 5 * 60;

/// Remote launcher policy the session consults. Injected, never global.
pub trait PolicyProvider: Send + Sync {
    fn channel_visible(&self, channel: Channel) -> bool;
    fn loader_visible(&self, loader: LoaderType) -> bool;
    /// Game versions for which the loader option is hidden.
    fn disabled_minecraft_versions(&self, loader: LoaderType) -> Vec<String>;
    /// Loader versions dropped from batched results.
    fn disabled_loader_versions(&self, loader: LoaderType) -> Vec<String>;
    fn use_batched_catalog(&self) -> bool;
    fn server_incompatible(&self, loader: LoaderType, minecraft_version: &str) -> bool;
    fn date_format(&self) -> String;
    fn catalog_freshness(&self) -> Duration;
    fn graphql_endpoint(&self) -> String;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `minecraft.<channel>.enabled`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelPolicies {
    pub release: Toggle,
    pub experiment: Toggle,
    pub snapshot: Toggle,
    pub old_beta: Toggle,
    pub old_alpha: Toggle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderPolicy {
    pub enabled: bool,
    pub disabled_minecraft_versions: Vec<String>,
    pub disabled_versions: Vec<String>,
}

impl Default for LoaderPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_minecraft_versions: Vec::new(),
            disabled_versions: Vec::new(),
        }
    }
}

/// `loaders.<loader>.*`. Quilt ships hidden unless enabled remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderPolicies {
    pub fabric: LoaderPolicy,
    pub forge: LoaderPolicy,
    pub quilt: LoaderPolicy,
    pub legacyfabric: LoaderPolicy,
}

impl Default for LoaderPolicies {
    fn default() -> Self {
        Self {
            fabric: LoaderPolicy::default(),
            forge: LoaderPolicy::default(),
            quilt: LoaderPolicy {
                enabled: false,
                ..LoaderPolicy::default()
            },
            legacyfabric: LoaderPolicy::default(),
        }
    }
}

impl LoaderPolicies {
    fn get(&self, loader: LoaderType) -> Option<&LoaderPolicy> {
        match loader {
            LoaderType::Vanilla => None,
            LoaderType::Fabric => Some(&self.fabric),
            LoaderType::Forge => Some(&self.forge),
            LoaderType::Quilt => Some(&self.quilt),
            LoaderType::LegacyFabric => Some(&self.legacyfabric),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlFlags {
    pub vanilla_loader_versions: bool,
}

/// Servers cannot be created for `loader` on game versions up to `max_minecraft_version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerRule {
    pub loader: LoaderType,
    pub max_minecraft_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LauncherPolicy {
    pub minecraft: ChannelPolicies,
    pub loaders: LoaderPolicies,
    pub use_graphql: GraphqlFlags,
    pub server_incompatible: Vec<ServerRule>,
    pub date_format: String,
    pub catalog_freshness_secs: u64,
    pub graphql_endpoint: String,
}

impl Default for LauncherPolicy {
    fn default() -> Self {
        Self {
            minecraft: ChannelPolicies::default(),
            loaders: LoaderPolicies::default(),
            use_graphql: GraphqlFlags::default(),
            // Legacy Forge doesn't support servers easily
            server_incompatible: vec![ServerRule {
                loader: LoaderType::Forge,
                max_minecraft_version: "1.5".into(),
            }],
            date_format: DEFAULT_DATE_FORMAT.into(),
            catalog_freshness_secs: DEFAULT_FRESHNESS_SECS,
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.into(),
        }
    }
}

impl LauncherPolicy {
    /// Parse the launcher config document. Missing keys keep their defaults.
    pub fn from_json(raw: &str) -> SetupResult<Self> {
        serde_json::from_str(raw).map_err(|e| SetupError::Policy(e.to_string()))
    }
}

impl PolicyProvider for LauncherPolicy {
    fn channel_visible(&self, channel: Channel) -> bool {
        let toggle = match channel {
            Channel::Stable => &self.minecraft.release,
            Channel::Experimental => &self.minecraft.experiment,
            Channel::Preview => &self.minecraft.snapshot,
            Channel::LegacyBeta => &self.minecraft.old_beta,
            Channel::LegacyAlpha => &self.minecraft.old_alpha,
        };
        toggle.enabled
    }

    fn loader_visible(&self, loader: LoaderType) -> bool {
        self.loaders.get(loader).map_or(true, |p| p.enabled)
    }

    fn disabled_minecraft_versions(&self, loader: LoaderType) -> Vec<String> {
        self.loaders
            .get(loader)
            .map(|p| p.disabled_minecraft_versions.clone())
            .unwrap_or_default()
    }

    fn disabled_loader_versions(&self, loader: LoaderType) -> Vec<String> {
        self.loaders
            .get(loader)
            .map(|p| p.disabled_versions.clone())
            .unwrap_or_default()
    }

    fn use_batched_catalog(&self) -> bool {
        self.use_graphql.vanilla_loader_versions
    }

    fn server_incompatible(&self, loader: LoaderType, minecraft_version: &str) -> bool {
        self.server_incompatible.iter().any(|rule| {
            rule.loader == loader
                && is_at_most(minecraft_version, &rule.max_minecraft_version) == Some(true)
        })
    }

    fn date_format(&self) -> String {
        self.date_format.clone()
    }

    fn catalog_freshness(&self) -> Duration {
        Duration::from_secs(self.catalog_freshness_secs)
    }

    fn graphql_endpoint(&self) -> String {
        self.graphql_endpoint.clone()
    }
}

/// Policy the host can swap at runtime, then announce via `SettingsChangeNotifier`.
#[derive(Debug, Default)]
pub struct SharedPolicy {
    inner: RwLock<LauncherPolicy>,
}

impl SharedPolicy {
    pub fn new(policy: LauncherPolicy) -> Self {
        Self {
            inner: RwLock::new(policy),
        }
    }

    pub fn replace(&self, policy: LauncherPolicy) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = policy;
    }

    fn read<T>(&self, f: impl FnOnce(&LauncherPolicy) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }
}

impl PolicyProvider for SharedPolicy {
    fn channel_visible(&self, channel: Channel) -> bool {
        self.read(|p| p.channel_visible(channel))
    }

    fn loader_visible(&self, loader: LoaderType) -> bool {
        self.read(|p| p.loader_visible(loader))
    }

    fn disabled_minecraft_versions(&self, loader: LoaderType) -> Vec<String> {
        self.read(|p| p.disabled_minecraft_versions(loader))
    }

    fn disabled_loader_versions(&self, loader: LoaderType) -> Vec<String> {
        self.read(|p| p.disabled_loader_versions(loader))
    }

    fn use_batched_catalog(&self) -> bool {
        self.read(|p| p.use_batched_catalog())
    }

    fn server_incompatible(&self, loader: LoaderType, minecraft_version: &str) -> bool {
        self.read(|p| p.server_incompatible(loader, minecraft_version))
    }

    fn date_format(&self) -> String {
        self.read(|p| p.date_format())
    }

    fn catalog_freshness(&self) -> Duration {
        self.read(|p| p.catalog_freshness())
    }

    fn graphql_endpoint(&self) -> String {
        self.read(|p| p.graphql_endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_launcher_config() {
        let policy = LauncherPolicy::default();

        assert!(Channel::ALL.iter().all(|c| policy.channel_visible(*c)));
        assert!(policy.loader_visible(LoaderType::Fabric));
        assert!(policy.loader_visible(LoaderType::Vanilla));
        assert!(!policy.loader_visible(LoaderType::Quilt));
        assert!(!policy.use_batched_catalog());
        assert_eq!(policy.catalog_freshness(), Duration::from_secs(300));
    }

    #[test]
    fn parses_nested_config_keys() {
        let policy = LauncherPolicy::from_json(
            r#"{
                "minecraft": {"old_alpha": {"enabled": false}},
                "loaders": {
                    "quilt": {"enabled": true},
                    "forge": {"disabledMinecraftVersions": ["1.2.4"], "disabledVersions": ["47.0.3"]}
                },
                "useGraphql": {"vanillaLoaderVersions": true},
                "dateFormat": "%Y-%m-%d"
            }"#,
        )
        .unwrap();

        assert!(!policy.channel_visible(Channel::LegacyAlpha));
        assert!(policy.channel_visible(Channel::LegacyBeta));
        assert!(policy.loader_visible(LoaderType::Quilt));
        assert_eq!(policy.disabled_minecraft_versions(LoaderType::Forge), vec!["1.2.4"]);
        assert_eq!(policy.disabled_loader_versions(LoaderType::Forge), vec!["47.0.3"]);
        assert!(policy.disabled_loader_versions(LoaderType::Fabric).is_empty());
        assert!(policy.use_batched_catalog());
        assert_eq!(policy.date_format(), "%Y-%m-%d");
        assert_eq!(policy.server_incompatible.len(), 1);
    }

    #[test]
    fn rejects_malformed_config() {
        assert!(matches!(
            LauncherPolicy::from_json(r#"{"loaders": 3}"#),
            Err(SetupError::Policy(_))
        ));
    }

    #[test]
    fn legacy_forge_servers_are_incompatible() {
        let policy = LauncherPolicy::default();

        assert!(policy.server_incompatible(LoaderType::Forge, "1.4.7"));
        assert!(policy.server_incompatible(LoaderType::Forge, "1.5"));
        assert!(!policy.server_incompatible(LoaderType::Forge, "1.5.2"));
        assert!(!policy.server_incompatible(LoaderType::Fabric, "1.4.7"));
        assert!(!policy.server_incompatible(LoaderType::Forge, "13w16a"));
    }

    #[test]
    fn shared_policy_sees_replacements() {
        let shared = SharedPolicy::new(LauncherPolicy::default());
        assert!(!shared.loader_visible(LoaderType::Quilt));

        let mut updated = LauncherPolicy::default();
        updated.loaders.quilt.enabled = true;
        shared.replace(updated);

        assert!(shared.loader_visible(LoaderType::Quilt));
    }
}
