use reqwest::blocking::ClientBuilder;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fmt::Display;
use std::time::Duration;

/// Per-request timeout used unless the caller sets one.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Placeholder substituted by [`fill_id`] in endpoint templates.
pub(crate) const ID_PLACEHOLDER: &str = ":id";

pub(crate) fn fill_id(template: &str, id: impl Display) -> String {
    template.replace(ID_PLACEHOLDER, &id.to_string())
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn user_agent() -> String {
    format!("activpik-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client builder shared by the API client and the authenticator.
pub(crate) fn http_builder() -> ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent()).unwrap_or(HeaderValue::from_static("activpik-rs")),
    );

    reqwest::blocking::Client::builder()
        .default_headers(default_headers)
        .timeout(DEFAULT_TIMEOUT)
}
