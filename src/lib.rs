//! A small Rust client for the Activpik media API.
//!
//! The client uploads media, starts transcription jobs and reads back media,
//! transcription and timecoded named-entity records. Requests are
//! authenticated with an OAuth2 client-credentials token that is obtained
//! on the first call.
//!
//! ## Quick start
//! - Configure credentials via environment variables (`ACTIVPIK_CLIENT_ID`,
//!   `ACTIVPIK_CLIENT_SECRET`, optionally `ACTIVPIK_URL`) or a `.activpikrc`
//!   file (supported in the current directory and in your home directory).
//! - Upload a file with [`Client::add_media`], then ask for a transcription.
//!
//! ```no_run
//! use activpik::Client;
//! use std::path::Path;
//!
//! fn main() -> activpik::Result<()> {
//!     let client = Client::from_env()?;
//!     let media = client.add_media(Path::new("talk.mp4"), "Talk", "Keynote")?;
//!     let id = media["id"].as_u64().unwrap_or_default();
//!     let job = client.transcribe_media(id)?;
//!     println!("transcription state: {}", job["state"]);
//!     Ok(())
//! }
//! ```
//!
//! Records are returned as [`serde_json::Value`] exactly as the server sends
//! them.

#![forbid(unsafe_code)]

mod auth;
mod client;
mod config;
mod endpoints;
mod error;
mod util;

pub use auth::{Authenticator, CLIENT_CREDENTIALS_GRANT, Credentials};
pub use client::{Client, ClientConfig};
pub use endpoints::{DEFAULT_BASE_URL, Endpoints};
pub use error::{Error, Result};
