pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{SetupError, SetupResult};
pub use crate::core::instance::{
    BuildRejection, InstallExecutor, InstallOutcome, InstallRequest, LoaderType,
};
pub use crate::core::loaders::{LoaderSource, LoaderVersion, LoaderVersionChoice, ResolverStatus};
pub use crate::core::state::{
    LauncherPolicy, PolicyProvider, SessionDeps, SessionUpdate, SessionView,
    SettingsChangeNotifier, SetupSession, SharedPolicy,
};
pub use crate::core::version::{Channel, VersionManifest};

/// Installs the structured logger. Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vanilla_setup_lib=debug")),
        )
        .try_init();

    tracing::info!("Vanilla setup engine starting...");
}
