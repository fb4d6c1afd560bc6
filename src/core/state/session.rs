// ─── Setup Session ───
// Owns one "create instance" workflow: channel filter, selection, resolver.
//
// All mutations go through `apply` on the owning task. Loader fetches run on
// spawned tasks and come back as `FetchCompletion`s; the owner feeds them in
// with `next_event`, `pump` or `settle`. After every change the projection is
// rebuilt and published on a watch channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};

use super::enablement::Enablement;
use super::policy::PolicyProvider;
use super::settings::SettingsChangeNotifier;
use super::view::{ChannelView, LoaderTypeView, SessionView};
use crate::core::error::SetupResult;
use crate::core::http::build_http_client;
use crate::core::instance::{
    BuildRejection, InstallExecutor, InstallOutcome, InstallRequest, InstallRequestBuilder,
    LoaderType, SelectionState,
};
use crate::core::loaders::{
    Applied, FetchCompletion, LoaderCatalog, LoaderResolver, LoaderSource, ResolverStatus,
};
use crate::core::version::{
    Channel, ChannelFilterStore, GameVersionCatalog, GameVersionCatalogView, VersionManifest,
    VersionRow,
};

/// Collaborators a session is built from.
pub struct SessionDeps {
    pub catalog: Arc<dyn GameVersionCatalog>,
    pub loaders: Arc<dyn LoaderCatalog>,
    pub policy: Arc<dyn PolicyProvider>,
    pub executor: Arc<dyn InstallExecutor>,
}

/// Every user-driven change a session accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    SetChannelSelected { channel: Channel, selected: bool },
    SelectGameVersion(String),
    SelectLoaderType(LoaderType),
    SelectLoaderVersion(String),
    SetName(String),
    SetDescription(String),
}

enum Event {
    Fetched(FetchCompletion),
    SettingsSaved,
    SettingsClosed,
}

/// One setup workflow. Selection changes spawn loader fetches, so the session
/// must be built inside a Tokio runtime or given one with [`SetupSession::with_runtime`].
pub struct SetupSession {
    catalog: Arc<dyn GameVersionCatalog>,
    policy: Arc<dyn PolicyProvider>,
    executor: Arc<dyn InstallExecutor>,
    channels: ChannelFilterStore,
    selection: SelectionState,
    resolver: LoaderResolver,
    completions: mpsc::UnboundedReceiver<FetchCompletion>,
    settings: Option<broadcast::Receiver<()>>,
    rows: Vec<VersionRow>,
    /// Loader version to keep across a policy-driven refetch, if still listed.
    kept_pick: Option<String>,
    view_tx: watch::Sender<SessionView>,
}

impl SetupSession {
    pub fn new(deps: SessionDeps, settings: &SettingsChangeNotifier) -> Self {
        let (tx, completions) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(SessionView::default());

        let mut session = Self {
            catalog: deps.catalog,
            policy: deps.policy,
            executor: deps.executor,
            channels: ChannelFilterStore::default(),
            selection: SelectionState::default(),
            resolver: LoaderResolver::new(deps.loaders, tx),
            completions,
            settings: Some(settings.subscribe()),
            rows: Vec::new(),
            kept_pick: None,
            view_tx,
        };
        session.refresh_rows();
        session.publish();
        info!(
            "Setup session ready with {} Minecraft versions listed",
            session.rows.len()
        );
        session
    }

    /// Production wiring: fetches the Mojang manifest and picks the loader
    /// catalog strategy from policy.
    pub async fn connect(
        policy: Arc<dyn PolicyProvider>,
        executor: Arc<dyn InstallExecutor>,
        settings: &SettingsChangeNotifier,
    ) -> SetupResult<Self> {
        let client = build_http_client()?;
        let manifest = VersionManifest::fetch(&client).await?;
        let loaders = LoaderSource::from_policy(Arc::clone(&policy), client);
        info!("Using {} loader catalog", loaders.strategy_name());

        Ok(Self::new(
            SessionDeps {
                catalog: Arc::new(manifest),
                loaders: Arc::new(loaders),
                policy,
                executor,
            },
            settings,
        ))
    }

    /// Spawn loader fetches on `runtime`, for hosts driving the session from sync code.
    pub fn with_runtime(mut self, runtime: tokio::runtime::Handle) -> Self {
        self.resolver = self.resolver.with_runtime(runtime);
        self
    }

    // ── Updates ──

    /// Single entry point for user input. Returns whether anything changed.
    pub fn apply(&mut self, update: SessionUpdate) -> bool {
        let changed = match update {
            SessionUpdate::SetChannelSelected { channel, selected } => {
                self.toggle_channel(channel, selected)
            }
            SessionUpdate::SelectGameVersion(id) => self.pick_game_version(&id),
            SessionUpdate::SelectLoaderType(loader) => self.pick_loader_type(loader),
            SessionUpdate::SelectLoaderVersion(version) => self.pick_loader_version(&version),
            SessionUpdate::SetName(text) => {
                self.selection.set_name(text);
                true
            }
            SessionUpdate::SetDescription(text) => {
                self.selection.set_description(text);
                true
            }
        };
        if changed {
            self.publish();
        }
        changed
    }

    pub fn set_channel_selected(&mut self, channel: Channel, selected: bool) -> bool {
        self.apply(SessionUpdate::SetChannelSelected { channel, selected })
    }

    pub fn select_game_version(&mut self, id: &str) -> bool {
        self.apply(SessionUpdate::SelectGameVersion(id.to_string()))
    }

    pub fn select_loader_type(&mut self, loader: LoaderType) -> bool {
        self.apply(SessionUpdate::SelectLoaderType(loader))
    }

    pub fn select_loader_version(&mut self, version: &str) -> bool {
        self.apply(SessionUpdate::SelectLoaderVersion(version.to_string()))
    }

    pub fn set_name(&mut self, text: &str) -> bool {
        self.apply(SessionUpdate::SetName(text.to_string()))
    }

    pub fn set_description(&mut self, text: &str) -> bool {
        self.apply(SessionUpdate::SetDescription(text.to_string()))
    }

    fn toggle_channel(&mut self, channel: Channel, selected: bool) -> bool {
        if !selected && !self.enablement().channel_filter_enabled(channel) {
            debug!("Refusing to deselect the last channel ({})", channel);
            return false;
        }
        if !self.channels.set_channel_selected(channel, selected) {
            return false;
        }
        self.refresh_rows();
        true
    }

    fn pick_game_version(&mut self, id: &str) -> bool {
        let Some(entry) = self.catalog.find(id).cloned() else {
            warn!("Ignoring unknown Minecraft version {}", id);
            return false;
        };
        if !self.selection.set_game_version(entry) {
            return false;
        }
        self.ensure_loader_visible();
        self.request_loaders();
        true
    }

    fn pick_loader_type(&mut self, loader: LoaderType) -> bool {
        if !self.enablement().loader_type_visible(loader) {
            warn!("Ignoring hidden loader {}", loader);
            return false;
        }
        if !self.selection.set_loader_type(loader) {
            return false;
        }
        self.request_loaders();
        true
    }

    fn pick_loader_version(&mut self, version: &str) -> bool {
        if self.selection.loader_version().map(|v| v.version.as_str()) == Some(version) {
            return false;
        }
        match self.resolver.find(version).cloned() {
            Some(found) => {
                self.selection.set_loader_version(Some(found));
                true
            }
            None => {
                debug!("Loader version {} is not in the current list", version);
                false
            }
        }
    }

    /// Falls back to Vanilla when the selected loader is hidden for the current state.
    fn ensure_loader_visible(&mut self) -> bool {
        let loader = self.selection.loader_type();
        if self.enablement().loader_type_visible(loader) {
            return false;
        }
        info!("{} is unavailable here, switching to Vanilla", loader);
        self.selection.set_loader_type(LoaderType::Vanilla)
    }

    fn request_loaders(&mut self) {
        self.kept_pick = None;
        self.resolver.request(
            self.selection.game_version_id(),
            self.selection.loader_type(),
        );
    }

    fn refresh_rows(&mut self) {
        let date_format = self.policy.date_format();
        let view = GameVersionCatalogView::new(self.catalog.as_ref(), &date_format);
        self.rows = view.rows(self.channels.selected_channels());
    }

    // ── Async events ──

    /// Waits for one fetch completion or settings signal and applies it.
    pub async fn next_event(&mut self) {
        let event = tokio::select! {
            completion = self.completions.recv() => match completion {
                Some(completion) => Event::Fetched(completion),
                // The resolver holds the sender, so this never closes first.
                None => return,
            },
            saved = next_settings_signal(&mut self.settings) => {
                if saved {
                    Event::SettingsSaved
                } else {
                    Event::SettingsClosed
                }
            }
        };
        self.handle(event);
    }

    /// Applies whatever is already queued without waiting. Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.handle(Event::Fetched(completion));
            handled += 1;
        }

        let mut saved = false;
        let mut closed = false;
        if let Some(rx) = self.settings.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => saved = true,
                    Err(broadcast::error::TryRecvError::Empty) => break,
                    Err(broadcast::error::TryRecvError::Closed) => {
                        closed = true;
                        break;
                    }
                }
            }
        }
        if saved {
            self.handle(Event::SettingsSaved);
            handled += 1;
        }
        if closed {
            self.handle(Event::SettingsClosed);
        }
        handled
    }

    /// Waits until the current loader request has settled.
    pub async fn settle(&mut self) {
        while self.resolver.is_loading() {
            self.next_event().await;
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Fetched(completion) => {
                if let Applied::Settled { default_pick, .. } = self.resolver.apply(completion) {
                    let kept = self
                        .kept_pick
                        .take()
                        .and_then(|version| self.resolver.find(&version).cloned());
                    self.selection.set_loader_version(kept.or(default_pick));
                    self.publish();
                }
            }
            Event::SettingsSaved => self.reload_policy(),
            Event::SettingsClosed => {
                debug!("Settings notifier dropped");
                self.settings = None;
            }
        }
    }

    fn reload_policy(&mut self) {
        info!("Settings saved, re-reading launcher policy");
        self.refresh_rows();
        if self.ensure_loader_visible() {
            self.request_loaders();
        } else if self.resolver.status() == ResolverStatus::Ready
            && self.policy.use_batched_catalog()
        {
            // Disabled loader versions may have changed; the cache makes this cheap.
            let pick = self.selection.loader_version().map(|v| v.version.clone());
            self.selection.set_loader_version(None);
            self.request_loaders();
            self.kept_pick = pick;
        }
        self.publish();
    }

    // ── Queries ──

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn resolver_status(&self) -> ResolverStatus {
        self.resolver.status()
    }

    pub fn enablement(&self) -> Enablement<'_> {
        Enablement::new(
            &self.channels,
            &self.selection,
            self.resolver.status(),
            self.policy.as_ref(),
            self.catalog.as_ref(),
        )
    }

    pub fn build_request(&self, is_server: bool) -> Result<InstallRequest, BuildRejection> {
        InstallRequestBuilder::new(&self.selection).build(is_server)
    }

    /// Builds a request and hands it to the executor. The selection is left as is either way.
    pub async fn install(&self, is_server: bool) -> InstallOutcome {
        let request = match self.build_request(is_server) {
            Ok(request) => request,
            Err(rejection) => {
                warn!("Install rejected: {}", rejection);
                return InstallOutcome::Rejected(rejection);
            }
        };

        info!(
            "Installing {} (Minecraft {}, {}, server: {})",
            request.name, request.game_version.id, request.loader_type, request.is_server
        );
        match self.executor.execute(&request).await {
            Ok(()) => {
                info!("Installed {}", request.name);
                InstallOutcome::Installed(request)
            }
            Err(err) => {
                error!("Error installing {}: {}", request.name, err);
                let message = err.to_string();
                InstallOutcome::Failed(request, message)
            }
        }
    }

    // ── Projection ──

    pub fn view(&self) -> SessionView {
        self.view_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    fn publish(&self) {
        let view = self.build_view();
        self.view_tx.send_replace(view);
    }

    fn build_view(&self) -> SessionView {
        let enablement = self.enablement();
        SessionView {
            channels: Channel::ALL
                .iter()
                .map(|&channel| ChannelView {
                    channel,
                    visible: enablement.channel_visible(channel),
                    selected: self.channels.is_selected(channel),
                    enabled: enablement.channel_filter_enabled(channel),
                })
                .collect(),
            game_versions: self.rows.clone(),
            selected_game_version: self.selection.game_version_id().map(str::to_string),
            loader_types: LoaderType::ALL
                .iter()
                .map(|&loader| LoaderTypeView {
                    loader,
                    visible: enablement.loader_type_visible(loader),
                    selected: self.selection.loader_type() == loader,
                    enabled: enablement.loader_type_enabled(loader),
                })
                .collect(),
            loader_status: self.resolver.status(),
            loader_versions: self.resolver.choices(),
            loader_versions_enabled: enablement.loader_versions_enabled(),
            selected_loader_version: self
                .selection
                .loader_version()
                .map(|v| v.version.clone()),
            name: self.selection.name().to_string(),
            name_dirty: self.selection.name_dirty(),
            description: self.selection.description().to_string(),
            description_dirty: self.selection.description_dirty(),
            create_server_enabled: enablement.create_server_enabled(),
            create_instance_enabled: enablement.create_instance_enabled(),
        }
    }
}

/// `true` on a save signal (lagged signals collapse into one), `false` once the notifier is gone.
async fn next_settings_signal(settings: &mut Option<broadcast::Receiver<()>>) -> bool {
    let Some(rx) = settings.as_mut() else {
        return std::future::pending().await;
    };
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => true,
        Err(broadcast::error::RecvError::Closed) => false,
    }
}
