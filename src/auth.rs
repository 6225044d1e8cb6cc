//! OAuth2 installed-app authentication for the Photos Library API.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use tokio::sync::RwLock;

use crate::credentials::CredentialStore;
use crate::error::{PhotosError, Result};
use crate::models::{ApplicationCredentials, Token, TokenResponse};

/// Read-only access to the user's photo library.
pub const PHOTOS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";

/// Opaque state sent with the authorization request.
const AUTH_STATE: &str = "state-token";

/// Tokens are refreshed this many seconds before they expire.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth2 client configuration: application credentials plus requested scopes.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Build a configuration from the application credentials and scopes.
    ///
    /// The first non-empty redirect URI is used; credentials without one are
    /// rejected.
    pub fn new(credentials: ApplicationCredentials, scopes: &[&str]) -> Result<Self> {
        let redirect_uri = credentials
            .redirect_uris
            .into_iter()
            .find(|uri| !uri.is_empty())
            .ok_or_else(|| PhotosError::InvalidCredentials("no redirect_uris".to_string()))?;

        Ok(Self {
            client_id: credentials.client_id,
            client_secret: credentials.client_secret,
            auth_uri: credentials.auth_uri,
            token_uri: credentials.token_uri,
            redirect_uri,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// URL the user opens in a browser to grant consent.
    pub fn authorization_url(&self) -> Result<String> {
        let scope = self.scopes.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", AUTH_STATE),
            ("access_type", "offline"),
        ];

        let url = Url::parse_with_params(&self.auth_uri, &params).map_err(|e| {
            PhotosError::InvalidCredentials(format!("bad auth_uri {}: {}", self.auth_uri, e))
        })?;
        Ok(url.to_string())
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, http: &Client, code: &str) -> Result<Token> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ];

        let response = self
            .request_token(http, &params)
            .await
            .map_err(|e| PhotosError::TokenExchangeError(e.to_string()))?;

        Ok(token_from_response(response, None))
    }

    /// Obtain a fresh access token using the refresh token of `token`.
    pub async fn refresh(&self, http: &Client, token: &Token) -> Result<Token> {
        if token.refresh_token.is_empty() {
            return Err(PhotosError::TokenRefreshError(
                "token has expired and carries no refresh token".to_string(),
            ));
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", &token.refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];

        let response = self
            .request_token(http, &params)
            .await
            .map_err(|e| PhotosError::TokenRefreshError(e.to_string()))?;

        Ok(token_from_response(response, Some(&token.refresh_token)))
    }

    async fn request_token(&self, http: &Client, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = http.post(&self.token_uri).form(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PhotosError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Convert a token endpoint response, keeping `previous_refresh` when the
/// provider does not rotate the refresh token.
fn token_from_response(response: TokenResponse, previous_refresh: Option<&str>) -> Token {
    let refresh_token = response
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| previous_refresh.map(str::to_string))
        .unwrap_or_default();

    Token {
        access_token: response.access_token,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        refresh_token,
        expiry: response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs)),
    }
}

/// Holds the current token and refreshes it before it expires.
///
/// Refreshed tokens are written back through the credential store when one
/// is attached.
#[derive(Clone)]
pub struct Authenticator {
    config: Arc<OAuthConfig>,
    client: Client,
    token: Arc<RwLock<Token>>,
    store: Option<CredentialStore>,
}

impl Authenticator {
    /// Create a new authenticator from a client configuration and a token.
    pub fn new(config: OAuthConfig, token: Token) -> Self {
        Self {
            config: Arc::new(config),
            client: Client::new(),
            token: Arc::new(RwLock::new(token)),
            store: None,
        }
    }

    /// Persist refreshed tokens through `store`.
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Snapshot of the token currently held in memory.
    pub async fn token(&self) -> Token {
        self.token.read().await.clone()
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        let leeway = Duration::seconds(EXPIRY_LEEWAY_SECS);

        {
            let token = self.token.read().await;
            if !token.is_expired_at(Utc::now(), leeway) {
                return Ok(token.access_token.clone());
            }
        }

        let mut token = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if !token.is_expired_at(Utc::now(), leeway) {
            return Ok(token.access_token.clone());
        }

        log::debug!("Access token expired, refreshing");
        let refreshed = self.config.refresh(&self.client, &token).await?;

        if let Some(store) = &self.store {
            if let Err(e) = store.save_token(&refreshed) {
                log::warn!("Refreshed token could not be saved: {}", e);
            }
        }

        *token = refreshed;
        Ok(token.access_token.clone())
    }
}
