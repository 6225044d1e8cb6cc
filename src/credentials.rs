//! Local credential storage and the interactive consent flow.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use reqwest::{Client, Url};

use crate::auth::OAuthConfig;
use crate::error::{PhotosError, Result};
use crate::models::{ClientSecrets, Token};

/// Source of the authorization code the user obtains from the consent page.
pub trait CodeProvider {
    /// Present `auth_url` to the user and return the resulting code.
    fn authorization_code(&self, auth_url: &str) -> Result<String>;
}

impl<F> CodeProvider for F
where
    F: Fn(&str) -> Result<String>,
{
    fn authorization_code(&self, auth_url: &str) -> Result<String> {
        self(auth_url)
    }
}

/// Prints the consent URL and reads the code from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinCodeProvider;

impl CodeProvider for StdinCodeProvider {
    fn authorization_code(&self, auth_url: &str) -> Result<String> {
        prompt_for_code(io::stdin().lock(), io::stdout(), auth_url)
    }
}

/// Show `auth_url` on `output` and read one line holding the code from `input`.
fn prompt_for_code<R, W>(mut input: R, mut output: W, auth_url: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Open the link below in your browser and paste the code here:")?;
    writeln!(output, "{}", auth_url)?;
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| PhotosError::AuthorizationCodeError(e.to_string()))?;
    if read == 0 {
        return Err(PhotosError::AuthorizationCodeError(
            "standard input closed".to_string(),
        ));
    }

    extract_code(&line)
}

/// Extract an authorization code from user input.
///
/// Accepts either the bare code or the full redirect URL the browser landed
/// on, e.g. `http://localhost/?code=4/0Ab...&scope=...`.
///
/// # Examples
///
/// ```
/// use photos_download::credentials::extract_code;
///
/// assert_eq!(extract_code("4/0AbCd").unwrap(), "4/0AbCd");
/// assert_eq!(
///     extract_code("http://localhost/?code=4%2F0AbCd&scope=x").unwrap(),
///     "4/0AbCd"
/// );
/// ```
pub fn extract_code(input: &str) -> Result<String> {
    let trimmed = input.trim();

    if trimmed.contains("://") {
        let url = Url::parse(trimmed)
            .map_err(|e| PhotosError::AuthorizationCodeError(format!("{}: {}", trimmed, e)))?;

        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" if !value.is_empty() => return Ok(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        return Err(PhotosError::AuthorizationCodeError(match error {
            Some(reason) => format!("authorization denied: {}", reason),
            None => format!("no code in {}", trimmed),
        }));
    }

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(PhotosError::AuthorizationCodeError(format!(
            "invalid code {:?}",
            input
        )));
    }

    Ok(trimmed.to_string())
}

/// Application credentials and token files on local disk.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl CredentialStore {
    pub fn new<C: Into<PathBuf>, T: Into<PathBuf>>(credentials_path: C, token_path: T) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the OAuth client configuration from the credentials file.
    pub fn load_config(&self, scopes: &[&str]) -> Result<OAuthConfig> {
        let content = fs::read_to_string(&self.credentials_path).map_err(|source| {
            PhotosError::CredentialsFileError {
                path: self.credentials_path.clone(),
                source,
            }
        })?;

        let secrets: ClientSecrets =
            serde_json::from_str(&content).map_err(|source| PhotosError::CredentialsParseError {
                path: self.credentials_path.clone(),
                source,
            })?;

        let credentials = secrets.installed.or(secrets.web).ok_or_else(|| {
            PhotosError::InvalidCredentials(
                "expected an \"installed\" or \"web\" client".to_string(),
            )
        })?;

        if credentials.client_id.is_empty() {
            return Err(PhotosError::InvalidCredentials(
                "client_id is empty".to_string(),
            ));
        }

        OAuthConfig::new(credentials, scopes)
    }

    /// Read the persisted token.
    pub fn load_token(&self) -> Result<Token> {
        let content = fs::read_to_string(&self.token_path)?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(token)
    }

    /// Write `token` to the token file, replacing any previous content.
    pub fn save_token(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string(token)?;
        fs::write(&self.token_path, json).map_err(|source| PhotosError::TokenSaveError {
            path: self.token_path.clone(),
            source,
        })?;
        log::info!("Token saved to {:?}", self.token_path);
        Ok(())
    }

    /// Return the persisted token, or run the consent flow and persist the
    /// token it yields.
    ///
    /// A cached token is returned as-is; expiry is handled by
    /// [`Authenticator`](crate::auth::Authenticator).
    pub async fn obtain_token(
        &self,
        config: &OAuthConfig,
        http: &Client,
        codes: &dyn CodeProvider,
    ) -> Result<Token> {
        match self.load_token() {
            Ok(token) => {
                log::debug!("Using cached token from {:?}", self.token_path);
                return Ok(token);
            }
            Err(e) => log::info!("No usable token at {:?} ({}), authorizing", self.token_path, e),
        }

        let auth_url = config.authorization_url()?;
        let code = codes.authorization_code(&auth_url)?;
        let token = config.exchange_code(http, &code).await?;

        self.save_token(&token)?;
        Ok(token)
    }
}
