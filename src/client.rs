//! Photos Library API client.

use reqwest::{Client, Response};

use crate::auth::{Authenticator, OAuthConfig};
use crate::credentials::CredentialStore;
use crate::error::{PhotosError, Result};
use crate::models::{
    AlbumListResponse, ApiErrorResponse, SearchMediaItemsRequest, SearchMediaItemsResponse, Token,
};

/// Base URL for the Photos Library API.
pub const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com";

/// Largest page the albums.list endpoint accepts.
pub const ALBUM_PAGE_SIZE: u32 = 50;

/// Largest page the mediaItems.search endpoint accepts.
pub const MEDIA_PAGE_SIZE: u32 = 100;

/// Build an authenticated client from a client configuration and a token.
///
/// When `store` is given, tokens refreshed during the run are written back
/// to it.
pub fn build_client(
    config: OAuthConfig,
    token: Token,
    store: Option<CredentialStore>,
) -> PhotosClient {
    let mut auth = Authenticator::new(config, token);
    if let Some(store) = store {
        auth = auth.with_store(store);
    }
    PhotosClient::new(auth)
}

/// HTTP client whose requests carry a valid bearer token.
pub struct PhotosClient {
    auth: Authenticator,
    http: Client,
    api_base: String,
}

impl PhotosClient {
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            http: Client::new(),
            api_base: PHOTOS_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Fetch one page of the user's albums.
    ///
    /// # Arguments
    /// * `page_token` - Cursor from the previous page, or empty for the first
    pub async fn list_albums(&self, page_token: &str) -> Result<AlbumListResponse> {
        let token = self.auth.get_access_token().await?;

        let mut request = self
            .http
            .get(format!("{}/v1/albums", self.api_base))
            .bearer_auth(&token)
            .query(&[("pageSize", ALBUM_PAGE_SIZE.to_string())]);

        if !page_token.is_empty() {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetch one page of the media items in an album.
    pub async fn search_media_items(
        &self,
        album_id: &str,
        page_token: &str,
    ) -> Result<SearchMediaItemsResponse> {
        let token = self.auth.get_access_token().await?;

        let body = SearchMediaItemsRequest {
            album_id,
            page_size: MEDIA_PAGE_SIZE,
            page_token: Some(page_token).filter(|t| !t.is_empty()),
        };

        let response = self
            .http
            .post(format!("{}/v1/mediaItems:search", self.api_base))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Issue an authorized GET for an arbitrary URL.
    ///
    /// The status is not checked.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let token = self.auth.get_access_token().await?;
        Ok(self.http.get(url).bearer_auth(&token).send().await?)
    }
}

/// Turn a non-success response into an `ApiError`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(PhotosError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(PhotosError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
