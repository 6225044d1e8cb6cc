//! photos_download CLI - Save a photo library to local disk.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use photos_download::auth::PHOTOS_READONLY_SCOPE;
use photos_download::{build_client, CredentialStore, Downloader, StdinCodeProvider};

/// Download every album of a photo library into per-year directories.
#[derive(Parser)]
#[command(name = "photos_download")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the OAuth client credentials JSON file.
    #[arg(long, env = "PHOTOS_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Path where the OAuth token is cached.
    #[arg(long, env = "PHOTOS_TOKEN", default_value = "token.json")]
    token: PathBuf,

    /// Directory that receives the `<year>/` folders.
    #[arg(long, short = 'o', env = "PHOTOS_OUTPUT", default_value = "photos")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = CredentialStore::new(&cli.credentials, &cli.token);

    let config = store
        .load_config(&[PHOTOS_READONLY_SCOPE])
        .with_context(|| format!("Failed to load credentials from {:?}", cli.credentials))?;

    let token = store
        .obtain_token(&config, &reqwest::Client::new(), &StdinCodeProvider)
        .await
        .context("Failed to obtain an access token")?;

    let client = build_client(config, token, Some(store));

    Downloader::new(client, &cli.output)
        .download_all()
        .await
        .context("Download failed")?;

    Ok(())
}
