use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checksum and size of one downloadable belonging to a loader version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub sha1: String,
    pub size: u64,
}

/// A selectable loader version as returned by a catalog backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoaderVersion {
    pub version: String,
    /// Full upstream version when it differs from the display one (Forge).
    pub raw_version: Option<String>,
    pub recommended: bool,
    /// Loader family name, e.g. "Forge".
    pub loader: String,
    /// Keyed by role: `installer`, `universal`, `client`, `server`.
    #[serde(default)]
    pub artifacts: BTreeMap<String, ArtifactInfo>,
}

impl LoaderVersion {
    pub fn new(version: impl Into<String>, recommended: bool, loader: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            raw_version: None,
            recommended,
            loader: loader.into(),
            artifacts: BTreeMap::new(),
        }
    }

    pub fn with_raw_version(mut self, raw: impl Into<String>) -> Self {
        self.raw_version = Some(raw.into());
        self
    }

    /// Records an artifact only when both checksum and size are known.
    pub fn add_artifact(&mut self, role: &str, sha1: Option<String>, size: Option<u64>) {
        if let (Some(sha1), Some(size)) = (sha1, size) {
            self.artifacts
                .insert(role.to_string(), ArtifactInfo { sha1, size });
        }
    }
}

/// Non-selectable entries shown in place of a version list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    SelectLoaderFirst,
    Loading,
    NoVersionsFound,
    Error,
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placeholder::SelectLoaderFirst => write!(f, "Select Loader First"),
            Placeholder::Loading => write!(f, "Loading..."),
            Placeholder::NoVersionsFound => write!(f, "No Versions Found"),
            Placeholder::Error => write!(f, "Error Getting Versions"),
        }
    }
}

/// What the loader version dropdown shows: real versions or a single placeholder.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoaderVersionChoice {
    Version(LoaderVersion),
    Placeholder { placeholder: Placeholder },
}

impl LoaderVersionChoice {
    pub fn label(&self) -> String {
        match self {
            LoaderVersionChoice::Version(v) => v.version.clone(),
            LoaderVersionChoice::Placeholder { placeholder } => placeholder.to_string(),
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, LoaderVersionChoice::Version(_))
    }
}

impl From<Placeholder> for LoaderVersionChoice {
    fn from(placeholder: Placeholder) -> Self {
        LoaderVersionChoice::Placeholder { placeholder }
    }
}
