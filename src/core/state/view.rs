use serde::Serialize;

use crate::core::instance::LoaderType;
use crate::core::loaders::{LoaderVersionChoice, ResolverStatus};
use crate::core::version::{Channel, VersionRow};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelView {
    pub channel: Channel,
    pub visible: bool,
    pub selected: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoaderTypeView {
    pub loader: LoaderType,
    pub visible: bool,
    pub selected: bool,
    pub enabled: bool,
}

/// Read-only projection handed to presentation after every update.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub channels: Vec<ChannelView>,
    pub game_versions: Vec<VersionRow>,
    pub selected_game_version: Option<String>,
    pub loader_types: Vec<LoaderTypeView>,
    pub loader_status: ResolverStatus,
    pub loader_versions: Vec<LoaderVersionChoice>,
    pub loader_versions_enabled: bool,
    pub selected_loader_version: Option<String>,
    pub name: String,
    pub name_dirty: bool,
    pub description: String,
    pub description_dirty: bool,
    pub create_server_enabled: bool,
    pub create_instance_enabled: bool,
}

impl SessionView {
    pub fn game_version_ids(&self) -> Vec<&str> {
        self.game_versions.iter().map(|row| row.id.as_str()).collect()
    }

    pub fn loader_type(&self, loader: LoaderType) -> Option<&LoaderTypeView> {
        self.loader_types.iter().find(|row| row.loader == loader)
    }

    pub fn channel(&self, channel: Channel) -> Option<&ChannelView> {
        self.channels.iter().find(|row| row.channel == channel)
    }
}
