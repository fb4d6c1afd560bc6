use serde::{Deserialize, Serialize};

/// Supported mod loaders.
///
/// `Vanilla` means "no loader" and is the default selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    #[default]
    Vanilla,
    Fabric,
    Forge,
    Quilt,
    #[serde(rename = "legacyfabric")]
    LegacyFabric,
}

impl LoaderType {
    pub const ALL: [LoaderType; 5] = [
        LoaderType::Vanilla,
        LoaderType::Fabric,
        LoaderType::Forge,
        LoaderType::Quilt,
        LoaderType::LegacyFabric,
    ];

    pub fn is_vanilla(self) -> bool {
        self == LoaderType::Vanilla
    }
}

impl std::fmt::Display for LoaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderType::Vanilla => write!(f, "Vanilla"),
            LoaderType::Fabric => write!(f, "Fabric"),
            LoaderType::Forge => write!(f, "Forge"),
            LoaderType::Quilt => write!(f, "Quilt"),
            LoaderType::LegacyFabric => write!(f, "LegacyFabric"),
        }
    }
}
