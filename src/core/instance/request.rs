use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::model::LoaderType;
use super::selection::SelectionState;
use crate::core::error::SetupResult;
use crate::core::loaders::LoaderVersion;
use crate::core::version::VersionEntry;

/// Finalized install request handed to the installer.
#[derive(Debug, Clone, Serialize)]
pub struct InstallRequest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub game_version: VersionEntry,
    pub loader_type: LoaderType,
    pub loader_version: Option<LoaderVersion>,
    pub name: String,
    pub description: String,
    pub is_server: bool,
}

/// Why a request could not be built from the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildRejection {
    #[error("no Minecraft version selected")]
    NoGameVersion,
    #[error("no {0} version selected")]
    NoLoaderVersion(LoaderType),
}

/// Snapshots a [`SelectionState`] into an [`InstallRequest`] without touching it.
pub struct InstallRequestBuilder<'a> {
    selection: &'a SelectionState,
}

impl<'a> InstallRequestBuilder<'a> {
    pub fn new(selection: &'a SelectionState) -> Self {
        Self { selection }
    }

    pub fn build(&self, is_server: bool) -> Result<InstallRequest, BuildRejection> {
        let game_version = self
            .selection
            .game_version()
            .ok_or(BuildRejection::NoGameVersion)?;

        let loader_type = self.selection.loader_type();
        let loader_version = self.selection.loader_version().cloned();
        if !loader_type.is_vanilla() && loader_version.is_none() {
            return Err(BuildRejection::NoLoaderVersion(loader_type));
        }

        Ok(InstallRequest {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            game_version: game_version.clone(),
            loader_type,
            loader_version,
            name: self.selection.name().to_string(),
            description: self.selection.description().to_string(),
            is_server,
        })
    }
}

/// Performs the actual install. Long-running; lives outside the engine.
#[async_trait]
pub trait InstallExecutor: Send + Sync {
    async fn execute(&self, request: &InstallRequest) -> SetupResult<()>;
}

/// How an install attempt ended.
#[derive(Debug)]
pub enum InstallOutcome {
    Installed(InstallRequest),
    Rejected(BuildRejection),
    Failed(InstallRequest, String),
}
