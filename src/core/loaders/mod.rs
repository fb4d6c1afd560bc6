pub mod batched;
pub mod cache;
pub mod catalog;
pub mod direct;
pub mod fabric;
pub mod forge;
pub mod model;
pub mod quilt;
pub mod resolver;

pub use batched::{BatchedCatalog, BatchedSource, GraphqlSource, LoaderVersionsPayload};
pub use cache::LoaderVersionCache;
pub use catalog::{LoaderCatalog, LoaderSource};
pub use direct::DirectCatalog;
pub use model::{ArtifactInfo, LoaderVersion, LoaderVersionChoice, Placeholder};
pub use resolver::{Applied, FetchCompletion, LoaderResolver, ResolverStatus};
