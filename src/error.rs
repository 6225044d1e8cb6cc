//! Error types for the photos_download crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while authenticating against or downloading from
/// the photo library.
#[derive(Error, Debug)]
pub enum PhotosError {
    #[error("Failed to read credentials file {path:?}")]
    CredentialsFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file {path:?}")]
    CredentialsParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid client configuration: {0}")]
    InvalidCredentials(String),

    #[error("Failed to read authorization code: {0}")]
    AuthorizationCodeError(String),

    #[error("Authorization code exchange failed: {0}")]
    TokenExchangeError(String),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("Failed to save token to {path:?}")]
    TokenSaveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected status {status} downloading {url}")]
    DownloadStatusError { status: u16, url: String },

    #[error("Failed to create directory {path:?}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download album {title}")]
    AlbumError {
        title: String,
        #[source]
        source: Box<PhotosError>,
    },

    #[error("Failed to download {name}")]
    ItemError {
        name: String,
        #[source]
        source: Box<PhotosError>,
    },
}

/// Result type alias for PhotosError.
pub type Result<T> = std::result::Result<T, PhotosError>;
