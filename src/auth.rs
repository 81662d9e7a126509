use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::util::{DEFAULT_TIMEOUT, http_builder};

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// OAuth2 client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant_type: CLIENT_CREDENTIALS_GRANT.to_string(),
        }
    }

    fn form(&self) -> [(&'static str, &str); 3] {
        [
            ("grant_type", self.grant_type.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Obtains an access token with the client-credentials grant and stamps it
/// on outgoing requests as `Authorization: OAuth <token>`.
///
/// The token is requested on first use and then kept for the lifetime of
/// the authenticator. It is never refreshed: once the server expires it,
/// every request fails until a new authenticator is built.
pub struct Authenticator {
    token_url: String,
    credentials: Credentials,
    http: HttpClient,
    timeout: Duration,
    token: Mutex<Option<String>>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl Authenticator {
    /// Creates an authenticator with its own HTTP client.
    pub fn new(token_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let http = http_builder().build()?;
        Ok(Self::with_http(http, token_url, credentials))
    }

    /// Creates an authenticator that shares an existing HTTP client.
    pub fn with_http(
        http: HttpClient,
        token_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            credentials,
            http,
            timeout: DEFAULT_TIMEOUT,
            token: Mutex::new(None),
        }
    }

    /// Sets the timeout of the token request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn has_token(&self) -> bool {
        self.lock().is_some()
    }

    /// Returns the cached token, requesting one first if none is held yet.
    pub fn access_token(&self) -> Result<String> {
        let mut token = self.lock();
        if let Some(t) = token.as_ref() {
            return Ok(t.clone());
        }

        let fresh = self.request_access_token()?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    /// Adds the `Authorization` header to `req`.
    pub fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token()?;
        let mut value = HeaderValue::from_str(&format!("OAuth {}", token))
            .map_err(|_| Error::Auth {
                url: self.token_url.clone(),
                status: StatusCode::OK,
                server_message: Some("access token is not a valid header value".to_string()),
            })?;
        value.set_sensitive(true);
        Ok(req.header(AUTHORIZATION, value))
    }

    fn request_access_token(&self) -> Result<String> {
        debug!(url = %self.token_url, client_id = %self.credentials.client_id, "requesting access token");

        let resp = self
            .http
            .post(&self.token_url)
            .form(&self.credentials.form())
            .timeout(self.timeout)
            .send()?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if status != StatusCode::OK {
            warn!(url = %self.token_url, %status, "access token request refused");
            return Err(Error::auth(&self.token_url, status, &text));
        }

        let parsed: TokenResponse = serde_json::from_str(&text).map_err(|e| Error::Auth {
            url: self.token_url.clone(),
            status,
            server_message: Some(format!("malformed token response: {}", e)),
        })?;

        info!(url = %self.token_url, "obtained access token");
        Ok(parsed.access_token)
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // A panic while holding the lock cannot leave a half-written token.
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_default_to_client_credentials_grant() {
        let c = Credentials::new("id", "secret");
        assert_eq!(c.grant_type, "client_credentials");
        assert_eq!(
            c.form(),
            [
                ("grant_type", "client_credentials"),
                ("client_id", "id"),
                ("client_secret", "secret"),
            ]
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let c = Credentials::new("super_client_id", "super_client_secret");
        let text = format!("{:?}", c);
        assert!(text.contains("super_client_id"));
        assert!(!text.contains("super_client_secret"));
    }

    #[test]
    fn new_authenticator_holds_no_token() {
        let auth = Authenticator::new(
            "http://localhost/oauth2/access_token/",
            Credentials::new("id", "secret"),
        )
        .unwrap();
        assert!(!auth.has_token());
        assert_eq!(auth.token_url(), "http://localhost/oauth2/access_token/");
    }
}
