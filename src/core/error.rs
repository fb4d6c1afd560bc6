use thiserror::Error;

/// Central error type for the setup engine and its catalog fetchers.
/// Every fallible module returns `Result<T, SetupError>`.
#[derive(Debug, Error)]
pub enum SetupError {
    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── XML ─────────────────────────────────────────────
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Loader catalogs ─────────────────────────────────
    #[error("Loader API unreachable: {0}")]
    LoaderApi(String),

    #[error("GraphQL query failed: {0}")]
    Graphql(String),

    // ── Install / policy ────────────────────────────────
    #[error("Install failed: {0}")]
    Install(String),

    #[error("Invalid launcher policy: {0}")]
    Policy(String),
}

/// Convenience alias used throughout the crate.
pub type SetupResult<T> = Result<T, SetupError>;
