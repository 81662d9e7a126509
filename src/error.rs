use reqwest::StatusCode;
use std::path::PathBuf;

/// Errors returned by the Activpik client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The access-token endpoint refused the credentials or answered with
    /// something other than a token.
    #[error("Can't get access token (HTTP {status} for url ({url})){}", server_suffix(.server_message))]
    Auth {
        url: String,
        status: StatusCode,
        server_message: Option<String>,
    },

    /// A create call (media upload, transcription) did not answer 201.
    #[error("{message} (HTTP {status} for url ({url})){}", server_suffix(.server_message))]
    Operation {
        message: &'static str,
        url: String,
        status: StatusCode,
        server_message: Option<String>,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse API JSON (url={url}, status={status})")]
    Decode {
        url: String,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status reported by the server, when the error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Auth { status, .. }
            | Error::Operation { status, .. }
            | Error::Decode { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            Error::Io { .. } | Error::Config(_) => None,
        }
    }

    pub(crate) fn auth(url: &str, status: StatusCode, body: &str) -> Self {
        Error::Auth {
            url: url.to_string(),
            status,
            server_message: server_message(body),
        }
    }

    pub(crate) fn operation(
        message: &'static str,
        url: &str,
        status: StatusCode,
        body: String,
    ) -> Self {
        Error::Operation {
            message,
            url: url.to_string(),
            status,
            server_message: server_message(&body),
            body,
        }
    }
}

// OAuth endpoints answer {"error": ..., "error_description": ...}, the REST
// API answers {"error_message": ...} (sometimes with a traceback).
#[derive(Debug, serde::Deserialize)]
struct ActivpikErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let e = serde_json::from_str::<ActivpikErrorResponse>(body).ok()?;

    if let Some(msg) = e.error_message.or(e.detail) {
        return Some(msg);
    }

    match (e.error, e.error_description) {
        (Some(code), Some(desc)) => Some(format!("{}: {}", code, desc)),
        (Some(code), None) => Some(code),
        (None, Some(desc)) => Some(desc),
        (None, None) => None,
    }
}

fn server_suffix(msg: &Option<String>) -> String {
    match msg {
        Some(m) if !m.trim().is_empty() => format!("\nServer message: {}", m.trim()),
        _ => String::new(),
    }
}
