use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, Response};

use crate::core::error::{SetupError, SetupResult};

const APP_USER_AGENT: &str = "VanillaSetup/0.1.0";

/// Shared client for every catalog fetcher (manifest, loader metas, GraphQL).
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}

/// Turns a non-2xx response into `SetupError::LoaderApi`, naming the source.
pub fn ensure_success(resp: Response, source: &str) -> SetupResult<Response> {
    if !resp.status().is_success() {
        return Err(SetupError::LoaderApi(format!(
            "{} returned {} for {}",
            source,
            resp.status(),
            resp.url()
        )));
    }
    Ok(resp)
}
