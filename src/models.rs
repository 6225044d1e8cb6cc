//! Data models for the Photos Library API and the local OAuth files.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// OAuth2 token as persisted to the token file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

/// Token files written by Go tooling carry `0001-01-01T00:00:00Z` for
/// "no expiry"; load that as `None`.
fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<DateTime<Utc>> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|expiry| expiry.year() > 1))
}

impl Token {
    /// Whether the token expires within `leeway` of `now`.
    ///
    /// A token without an expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: chrono::Duration) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now + leeway,
            None => false,
        }
    }
}

/// Client secrets file as downloaded from the cloud console.
///
/// Exactly one of `installed` or `web` is expected to be present.
#[derive(Debug, Deserialize)]
pub struct ClientSecrets {
    #[serde(default)]
    pub installed: Option<ApplicationCredentials>,
    #[serde(default)]
    pub web: Option<ApplicationCredentials>,
}

/// OAuth client id/secret and endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// An album in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Response from the albums.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListResponse {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A photo or video in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub media_metadata: Option<MediaMetadata>,
}

impl MediaItem {
    /// The raw creation time, if the item carries a non-empty one.
    pub fn creation_time(&self) -> Option<&str> {
        self.media_metadata
            .as_ref()
            .and_then(|m| m.creation_time.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// URL that serves the original bytes of the item.
    pub fn download_url(&self) -> String {
        format!("{}=d", self.base_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// Request body for mediaItems.search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsRequest<'a> {
    pub album_id: &'a str,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

/// Response from the mediaItems.search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsResponse {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
