pub mod catalog;
pub mod channel;
pub mod compare;
pub mod manifest;

pub use catalog::{GameVersionCatalog, GameVersionCatalogView, VersionRow};
pub use channel::{Channel, ChannelFilterStore};
pub use manifest::{VersionEntry, VersionManifest};
