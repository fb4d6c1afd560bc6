pub mod enablement;
pub mod policy;
pub mod session;
pub mod settings;
pub mod view;

pub use enablement::Enablement;
pub use policy::{LauncherPolicy, PolicyProvider, SharedPolicy};
pub use session::{SessionDeps, SessionUpdate, SetupSession};
pub use settings::SettingsChangeNotifier;
pub use view::{ChannelView, LoaderTypeView, SessionView};
