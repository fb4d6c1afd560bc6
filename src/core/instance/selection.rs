use serde::Serialize;

use super::model::LoaderType;
use crate::core::loaders::LoaderVersion;
use crate::core::version::VersionEntry;

/// Default instance name/description for a selection.
///
/// `None` until a game version is chosen.
pub fn default_name(minecraft_version: Option<&str>, loader: LoaderType) -> Option<String> {
    let version = minecraft_version?;
    Some(if loader.is_vanilla() {
        format!("Minecraft {}", version)
    } else {
        format!("Minecraft {} with {}", version, loader)
    })
}

/// A text field that follows the computed default until the user edits it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DerivedField {
    pub text: String,
    pub dirty: bool,
}

impl DerivedField {
    /// User edit. Typing exactly the default counts as clean again.
    fn edit(&mut self, text: String, default: Option<&str>) {
        self.dirty = match default {
            Some(default) => text != default,
            None => !text.is_empty(),
        };
        self.text = text;
    }

    /// Follow the default unless the user owns the text. Empty text is never owned.
    fn follow(&mut self, default: Option<&str>) {
        let Some(default) = default else {
            return;
        };
        if !self.dirty || self.text.is_empty() {
            self.text = default.to_string();
            self.dirty = false;
        }
    }
}

/// Everything the user has chosen in one setup session.
///
/// Mutated only by the owning session; presentation gets read access.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionState {
    game_version: Option<VersionEntry>,
    loader_type: LoaderType,
    loader_version: Option<LoaderVersion>,
    name: DerivedField,
    description: DerivedField,
}

impl SelectionState {
    pub fn game_version(&self) -> Option<&VersionEntry> {
        self.game_version.as_ref()
    }

    pub fn game_version_id(&self) -> Option<&str> {
        self.game_version.as_ref().map(|v| v.id.as_str())
    }

    pub fn loader_type(&self) -> LoaderType {
        self.loader_type
    }

    pub fn loader_version(&self) -> Option<&LoaderVersion> {
        self.loader_version.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name.text
    }

    pub fn name_dirty(&self) -> bool {
        self.name.dirty
    }

    pub fn description(&self) -> &str {
        &self.description.text
    }

    pub fn description_dirty(&self) -> bool {
        self.description.dirty
    }

    pub fn default_name(&self) -> Option<String> {
        default_name(self.game_version_id(), self.loader_type)
    }

    /// Returns `false` when the version is already selected.
    pub(crate) fn set_game_version(&mut self, entry: VersionEntry) -> bool {
        if self.game_version.as_ref() == Some(&entry) {
            return false;
        }
        self.game_version = Some(entry);
        self.loader_version = None;
        self.refresh_defaults();
        true
    }

    /// Returns `false` when the loader type is already selected.
    pub(crate) fn set_loader_type(&mut self, loader: LoaderType) -> bool {
        if self.loader_type == loader {
            return false;
        }
        self.loader_type = loader;
        self.loader_version = None;
        self.refresh_defaults();
        true
    }

    pub(crate) fn set_loader_version(&mut self, version: Option<LoaderVersion>) {
        self.loader_version = version;
    }

    pub(crate) fn set_name(&mut self, text: String) {
        let default = self.default_name();
        self.name.edit(text, default.as_deref());
    }

    pub(crate) fn set_description(&mut self, text: String) {
        let default = self.default_name();
        self.description.edit(text, default.as_deref());
    }

    fn refresh_defaults(&mut self) {
        let default = self.default_name();
        self.name.follow(default.as_deref());
        self.description.follow(default.as_deref());
    }
}
