pub mod model;
pub mod request;
pub mod selection;

pub use model::LoaderType;
pub use request::{
    BuildRejection, InstallExecutor, InstallOutcome, InstallRequest, InstallRequestBuilder,
};
pub use selection::{default_name, DerivedField, SelectionState};
