//! photos_download - Download a photo library album by album.
//!
//! This library provides functionality to:
//! - Authorize against the Photos Library API with an installed-app OAuth2 flow
//! - List albums and the media items inside them
//! - Save every item under `photos/<year>/` with a collision-free name
//!
//! # Example
//!
//! ```no_run
//! use photos_download::auth::PHOTOS_READONLY_SCOPE;
//! use photos_download::credentials::{CredentialStore, StdinCodeProvider};
//! use photos_download::{build_client, Downloader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = CredentialStore::new("credentials.json", "token.json");
//!     let config = store.load_config(&[PHOTOS_READONLY_SCOPE])?;
//!     let token = store
//!         .obtain_token(&config, &reqwest::Client::new(), &StdinCodeProvider)
//!         .await?;
//!
//!     let client = build_client(config, token, Some(store));
//!     Downloader::new(client, "photos").download_all().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod credentials;
pub mod download;
pub mod error;
pub mod fetch;
pub mod models;
pub mod sanitize;

// Re-exports for convenience
pub use auth::{Authenticator, OAuthConfig};
pub use client::{build_client, PhotosClient};
pub use credentials::{CodeProvider, CredentialStore, StdinCodeProvider};
pub use download::{DownloadSummary, Downloader};
pub use error::{PhotosError, Result};
pub use models::Token;
