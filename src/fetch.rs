//! Streaming download of a single URL to a local file.

use std::io;
use std::path::Path;

use futures::TryStreamExt;
use reqwest::StatusCode;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::client::PhotosClient;
use crate::error::{PhotosError, Result};

/// Download `url` into `path`, creating or truncating the file.
///
/// Any status other than 200 is an error. Returns the number of bytes written.
pub async fn fetch(client: &PhotosClient, url: &str, path: &Path) -> Result<u64> {
    let response = client.get(url).await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(PhotosError::DownloadStatusError {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let mut file = File::create(path).await?;
    let stream = response.bytes_stream().map_err(io::Error::other);
    let mut body = StreamReader::new(Box::pin(stream));

    let written = tokio::io::copy(&mut body, &mut file).await?;
    file.flush().await?;

    log::debug!("Wrote {} bytes to {:?}", written, path);
    Ok(written)
}
