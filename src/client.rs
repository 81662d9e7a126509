use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{Authenticator, Credentials};
use crate::config::load_config;
use crate::endpoints::Endpoints;
use crate::error::{Error, Result};
use crate::util::{DEFAULT_TIMEOUT, http_builder};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base Activpik URL, typically `http://beta.activpik.com`.
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

impl ClientConfig {
    /// Resolves the configuration the way [`Client::new`] does: explicit
    /// arguments, then `ACTIVPIK_*` environment variables, then the rc file.
    pub fn load(
        url: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        verify: Option<bool>,
    ) -> Result<Self> {
        load_config(url, client_id, client_secret, verify)
    }
}

/// Activpik REST client.
///
/// Every call goes through the [`Authenticator`], which fetches an access
/// token on the first request and reuses it afterwards.
#[derive(Debug)]
pub struct Client {
    endpoints: Endpoints,
    auth: Authenticator,

    timeout: Duration,
    progress: bool,

    http: HttpClient,
}

impl Client {
    /// Creates a client using environment variables and/or `.activpikrc`.
    ///
    /// This is equivalent to `Client::new(None, None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit arguments
    /// - environment variables `ACTIVPIK_URL` / `ACTIVPIK_CLIENT_ID` / `ACTIVPIK_CLIENT_SECRET`
    /// - config file from `ACTIVPIK_RC` or `.activpikrc`
    pub fn new(
        url: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        verify: Option<bool>,
    ) -> Result<Self> {
        Self::from_config(ClientConfig::load(url, client_id, client_secret, verify)?)
    }

    pub fn from_config(cfg: ClientConfig) -> Result<Self> {
        let mut builder = http_builder();

        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build()?;
        let endpoints = Endpoints::with_base_url(cfg.url);
        let auth = Authenticator::with_http(
            http.clone(),
            endpoints.access_token_url(),
            Credentials::new(cfg.client_id, cfg.client_secret),
        );

        Ok(Self {
            endpoints,
            auth,
            timeout: DEFAULT_TIMEOUT,
            progress: true,
            http,
        })
    }

    /// Replaces the endpoint map.
    ///
    /// The access-token URL is taken from the new map, so any token already
    /// obtained is discarded.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.auth = Authenticator::with_http(
            self.http.clone(),
            endpoints.access_token_url(),
            self.auth.credentials().clone(),
        )
        .with_timeout(self.timeout);
        self.endpoints = endpoints;
        self
    }

    /// Sets the timeout of every request, the token request included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.auth = self.auth.with_timeout(timeout);
        self
    }

    /// Shows a progress bar on stderr while uploading media.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Uploads a media file. The API answers 201 with the new media record.
    ///
    /// `description` is sent as the media `resume` field.
    pub fn add_media(&self, file: &Path, title: &str, description: &str) -> Result<Value> {
        let url = self.endpoints.url(&self.endpoints.list_media);

        let io_err = |source| Error::Io {
            path: file.to_path_buf(),
            source,
        };
        let handle = File::open(file).map_err(io_err)?;
        let len = handle.metadata().map_err(io_err)?.len();
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let pb = if self.progress {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
            ) {
                pb.set_style(style.progress_chars("=>-"));
            }
            Some(pb)
        } else {
            None
        };

        let part = match &pb {
            Some(pb) => Part::reader_with_length(pb.wrap_read(handle), len),
            None => Part::reader_with_length(handle, len),
        }
        .file_name(file_name);

        let form = Form::new()
            .text("title", title.to_string())
            .text("resume", description.to_string())
            .part("file", part);

        let req = self.http.post(&url).multipart(form);
        let result = self.create(req, &url, "Can't create media");

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        let media = result?;
        info!(id = %media["id"], %title, "media created");
        Ok(media)
    }

    /// Lists the media owned by the current client.
    pub fn get_medias(&self) -> Result<Value> {
        self.get_json(&self.endpoints.url(&self.endpoints.list_media))
    }

    pub fn get_media(&self, id: u64) -> Result<Value> {
        self.get_json(&self.endpoints.url_with_id(&self.endpoints.get_media, id))
    }

    /// Starts a transcription job for a media. The API answers 201 with the
    /// new transcription record.
    pub fn transcribe_media(&self, media_id: u64) -> Result<Value> {
        let url = self.endpoints.url(&self.endpoints.list_transcription);
        let body = json!({ "media": self.endpoints.media_path(media_id) });

        let req = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json; charset=utf8")
            .body(body.to_string());
        let transcription = self.create(req, &url, "Can't create transcription")?;

        info!(media_id, id = %transcription["id"], "transcription requested");
        Ok(transcription)
    }

    pub fn get_transcriptions(&self) -> Result<Value> {
        self.get_json(&self.endpoints.url(&self.endpoints.list_transcription))
    }

    /// Fetches a transcription job record; its `state` field reports progress.
    pub fn get_transcription_status(&self, transcription_id: u64) -> Result<Value> {
        self.get_json(
            &self
                .endpoints
                .url_with_id(&self.endpoints.get_transcription, transcription_id),
        )
    }

    /// Timecoded named entities for every media of the current client.
    pub fn get_timecoded_named_entities(&self) -> Result<Value> {
        self.get_json(&self.endpoints.url(&self.endpoints.list_named_entities))
    }

    pub fn get_timecoded_named_entities_for_media(&self, media_id: u64) -> Result<Value> {
        self.get_json(
            &self
                .endpoints
                .url_with_id(&self.endpoints.list_named_entities_by_media, media_id),
        )
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self.send(self.http.get(url), "GET", url)?;

        // Read endpoints hand back whatever JSON the server sent, error
        // payloads included.
        let status = resp.status();
        let text = resp.text()?;
        parse_json(&text, url, status)
    }

    fn create(&self, req: RequestBuilder, url: &str, message: &'static str) -> Result<Value> {
        let resp = self.send(req, "POST", url)?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if status != StatusCode::CREATED {
            warn!(%url, %status, "{}", message);
            return Err(Error::operation(message, url, status, text));
        }

        parse_json(&text, url, status)
    }

    fn send(
        &self,
        req: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<reqwest::blocking::Response> {
        let req = self.auth.authorize(req)?.timeout(self.timeout);
        debug!(%method, %url, "sending request");
        Ok(req.send()?)
    }
}

fn parse_json(text: &str, url: &str, status: StatusCode) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| Error::Decode {
        url: url.to_string(),
        status,
        source,
    })
}
