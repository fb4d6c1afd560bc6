// ─── Enablement ───
// Pure projections of session state onto control enablement.
// Nothing here mutates; the session rebuilds one per query.

use crate::core::instance::{LoaderType, SelectionState};
use crate::core::loaders::ResolverStatus;
use crate::core::state::PolicyProvider;
use crate::core::version::{Channel, ChannelFilterStore, GameVersionCatalog};

pub struct Enablement<'a> {
    channels: &'a ChannelFilterStore,
    selection: &'a SelectionState,
    status: ResolverStatus,
    policy: &'a dyn PolicyProvider,
    catalog: &'a dyn GameVersionCatalog,
}

impl<'a> Enablement<'a> {
    pub fn new(
        channels: &'a ChannelFilterStore,
        selection: &'a SelectionState,
        status: ResolverStatus,
        policy: &'a dyn PolicyProvider,
        catalog: &'a dyn GameVersionCatalog,
    ) -> Self {
        Self {
            channels,
            selection,
            status,
            policy,
            catalog,
        }
    }

    fn resolving(&self) -> bool {
        self.status == ResolverStatus::Loading
    }

    pub fn channel_visible(&self, channel: Channel) -> bool {
        self.policy.channel_visible(channel)
    }

    /// The last selected channel cannot be unchecked.
    pub fn channel_filter_enabled(&self, channel: Channel) -> bool {
        let selected = self.channels.selected_channels();
        !(selected.len() == 1 && selected.contains(&channel))
    }

    pub fn loader_type_visible(&self, loader: LoaderType) -> bool {
        if loader.is_vanilla() {
            return true;
        }
        if !self.policy.loader_visible(loader) {
            return false;
        }
        match self.selection.game_version_id() {
            Some(id) => !self
                .policy
                .disabled_minecraft_versions(loader)
                .iter()
                .any(|v| v == id),
            None => true,
        }
    }

    pub fn loader_type_enabled(&self, loader: LoaderType) -> bool {
        self.loader_controls_enabled() && self.loader_type_visible(loader)
    }

    pub fn loader_controls_enabled(&self) -> bool {
        !self.resolving()
    }

    /// Only real entries can be picked; placeholders leave the list inert.
    pub fn loader_versions_enabled(&self) -> bool {
        self.status == ResolverStatus::Ready
    }

    pub fn create_server_enabled(&self) -> bool {
        if self.resolving() {
            return false;
        }
        let Some(game_version) = self.selection.game_version() else {
            return false;
        };
        if !self.catalog.has_server_artifact(game_version) {
            return false;
        }
        let loader = self.selection.loader_type();
        loader.is_vanilla() || !self.policy.server_incompatible(loader, &game_version.id)
    }

    pub fn create_instance_enabled(&self) -> bool {
        !self.resolving()
    }
}
