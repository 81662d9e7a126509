#![allow(dead_code)]

use activpik::{Client, ClientConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "super_client_id";
pub const CLIENT_SECRET: &str = "super_client_secret";
pub const TOKEN_PATH: &str = "/oauth2/access_token/";

/// Runs blocking client code off the async test runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

/// Serves `token` from the access-token endpoint, expecting a single call.
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 36000,
            "scope": "read write"
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub fn client_for(uri: &str) -> Client {
    Client::from_config(ClientConfig {
        url: uri.to_string(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        verify: true,
    })
    .expect("client should build")
    .with_progress(false)
}

pub fn media_record(id: u64) -> serde_json::Value {
    json!({
        "broadcast_state": "WA",
        "created_at": "2014-11-21",
        "duration": "423.88",
        "encoding_state": "DO",
        "file": "/medias/sources/5d9eae6d-2933-4765-bfa9-691e194d7812.mp4",
        "hd_available": false,
        "height": "480.00",
        "id": id,
        "resource_uri": format!("/api/v1/media/{}/", id),
        "resume": "",
        "state": "DR",
        "thumbnail": null,
        "title": "Test",
        "updated_at": "2014-11-21",
        "white_mark": false,
        "width": "852.00"
    })
}

pub fn transcription_record(id: u64, media_id: u64) -> serde_json::Value {
    json!({
        "callback_url": null,
        "created_at": "2014-11-21",
        "external_id": null,
        "id": id,
        "media": media_record(media_id),
        "resource_uri": format!("/api/v1/transcription/{}/", id),
        "state": "CR",
        "updated_at": "2014-11-21"
    })
}

pub fn entity_list(media_id: u64) -> serde_json::Value {
    json!({
        "meta": {"limit": 20, "next": null, "offset": 0, "previous": null, "total_count": 2},
        "objects": [
            {
                "begin": "2.00",
                "end": "5.00",
                "id": 2980,
                "media": format!("/api/v1/media/{}/", media_id),
                "parent_type": "[u'Place', u'PopulatedPlace', u'Country']",
                "resource_uri": "/api/v1/timecoded_entities/2980/",
                "type": "Place\\PopulatedPlace\\Country",
                "value": "français"
            },
            {
                "begin": "2.00",
                "end": "5.00",
                "id": 2981,
                "media": format!("/api/v1/media/{}/", media_id),
                "parent_type": "[u'Person', u'female']",
                "resource_uri": "/api/v1/timecoded_entities/2981/",
                "type": "Person\\female",
                "value": "Clara"
            }
        ]
    })
}
