use crate::util::{fill_id, urljoin};

/// Default Activpik deployment.
pub const DEFAULT_BASE_URL: &str = "http://beta.activpik.com";

/// Named endpoint templates, relative to `base_url`.
///
/// Templates may contain an `:id` placeholder that is replaced with the
/// resource id when the URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub oauth2_access_token: String,
    pub list_media: String,
    pub get_media: String,
    pub list_transcription: String,
    pub get_transcription: String,
    pub list_named_entities: String,
    pub list_named_entities_by_media: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            oauth2_access_token: "/oauth2/access_token/".to_string(),
            list_media: "/api/v1/media/".to_string(),
            get_media: "/api/v1/media/:id/".to_string(),
            list_transcription: "/api/v1/transcription/".to_string(),
            get_transcription: "/api/v1/transcription/:id/".to_string(),
            list_named_entities: "/api/v1/timecoded_entities/".to_string(),
            list_named_entities_by_media: "/api/v1/timecoded_entities/?media__id=:id".to_string(),
        }
    }
}

impl Endpoints {
    /// Default templates rooted at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn access_token_url(&self) -> String {
        self.url(&self.oauth2_access_token)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        urljoin(&self.base_url, path)
    }

    pub(crate) fn url_with_id(&self, template: &str, id: u64) -> String {
        self.url(&fill_id(template, id))
    }

    /// Relative media path, as the API expects it in references
    /// (`/api/v1/media/70/`).
    pub(crate) fn media_path(&self, id: u64) -> String {
        fill_id(&self.get_media, id)
    }
}
