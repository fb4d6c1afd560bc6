use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Release channel of a Minecraft version, as tagged by the manifest `type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    #[serde(rename = "release")]
    Stable,
    #[serde(rename = "experiment")]
    Experimental,
    #[serde(rename = "snapshot")]
    Preview,
    #[serde(rename = "old_beta")]
    LegacyBeta,
    #[serde(rename = "old_alpha")]
    LegacyAlpha,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Stable,
        Channel::Experimental,
        Channel::Preview,
        Channel::LegacyBeta,
        Channel::LegacyAlpha,
    ];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Stable => write!(f, "release"),
            Channel::Experimental => write!(f, "experiment"),
            Channel::Preview => write!(f, "snapshot"),
            Channel::LegacyBeta => write!(f, "old_beta"),
            Channel::LegacyAlpha => write!(f, "old_alpha"),
        }
    }
}

/// Channels the user currently wants listed.
///
/// Plain container: keeping the set non-empty is the caller's job
/// (see `Enablement::channel_filter_enabled`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFilterStore {
    selected: BTreeSet<Channel>,
}

impl Default for ChannelFilterStore {
    fn default() -> Self {
        Self {
            selected: BTreeSet::from([Channel::Stable]),
        }
    }
}

impl ChannelFilterStore {
    /// Returns `true` when the selection actually changed.
    pub fn set_channel_selected(&mut self, channel: Channel, selected: bool) -> bool {
        if selected {
            self.selected.insert(channel)
        } else {
            self.selected.remove(&channel)
        }
    }

    pub fn is_selected(&self, channel: Channel) -> bool {
        self.selected.contains(&channel)
    }

    pub fn selected_channels(&self) -> &BTreeSet<Channel> {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_stable_only() {
        let store = ChannelFilterStore::default();
        assert_eq!(
            store.selected_channels().iter().copied().collect::<Vec<_>>(),
            vec![Channel::Stable]
        );
    }

    #[test]
    fn toggling_to_current_value_is_a_no_op() {
        let mut store = ChannelFilterStore::default();

        assert!(!store.set_channel_selected(Channel::Stable, true));
        assert!(store.set_channel_selected(Channel::Preview, true));
        assert!(!store.set_channel_selected(Channel::Preview, true));
        assert!(store.is_selected(Channel::Preview));

        assert!(store.set_channel_selected(Channel::Preview, false));
        assert!(!store.set_channel_selected(Channel::Preview, false));
        assert!(!store.is_selected(Channel::Preview));
    }

    #[test]
    fn deserializes_manifest_type_tags() {
        let channels: Vec<Channel> =
            serde_json::from_str(r#"["release","snapshot","old_beta","old_alpha","experiment"]"#)
                .unwrap();
        assert_eq!(
            channels,
            vec![
                Channel::Stable,
                Channel::Preview,
                Channel::LegacyBeta,
                Channel::LegacyAlpha,
                Channel::Experimental,
            ]
        );
    }
}
