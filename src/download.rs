//! Downloads every album of the library into per-year directories.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::client::PhotosClient;
use crate::error::{PhotosError, Result};
use crate::fetch::fetch;
use crate::models::{format_size, Album, MediaItem};
use crate::sanitize::{extension_for, unique_name, year_of};

/// Counters for a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub albums: usize,
    pub items: usize,
    /// Items without a creation time.
    pub skipped: usize,
    pub bytes: u64,
}

/// Walks albums and their media items, saving each item under
/// `<output_dir>/<year>/`.
///
/// Processing is strictly sequential and stops at the first error.
pub struct Downloader {
    client: PhotosClient,
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: PhotosClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    /// Download every item of every album.
    pub async fn download_all(&self) -> Result<DownloadSummary> {
        let mut summary = DownloadSummary::default();
        let mut page_token = String::new();

        loop {
            let page = self.client.list_albums(&page_token).await?;
            log::debug!("Fetched {} albums", page.albums.len());

            for album in &page.albums {
                self.download_album(album, &mut summary)
                    .await
                    .map_err(|e| PhotosError::AlbumError {
                        title: album_name(album).to_string(),
                        source: Box::new(e),
                    })?;
                summary.albums += 1;
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        println!(
            "Download complete: {} items ({}) from {} albums",
            summary.items,
            format_size(summary.bytes),
            summary.albums
        );
        Ok(summary)
    }

    async fn download_album(&self, album: &Album, summary: &mut DownloadSummary) -> Result<()> {
        log::info!("Downloading album {}", album_name(album));
        let mut page_token = String::new();

        loop {
            let page = self
                .client
                .search_media_items(&album.id, &page_token)
                .await?;

            for item in &page.media_items {
                match self.download_item(item).await? {
                    Some(bytes) => {
                        summary.items += 1;
                        summary.bytes += bytes;
                    }
                    None => summary.skipped += 1,
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        Ok(())
    }

    /// Save one item. Returns `None` when the item has no creation time.
    async fn download_item(&self, item: &MediaItem) -> Result<Option<u64>> {
        let Some(creation_time) = item.creation_time() else {
            log::debug!("Skipping {}: no creation time", item.id);
            return Ok(None);
        };

        let date = parse_creation_time(creation_time).unwrap_or_else(|| {
            log::warn!(
                "Unparseable creation time {:?} for {}, using current time",
                creation_time,
                item.id
            );
            Utc::now()
        });

        let filename = unique_name(&format!("{}{}", item.id, extension_for(&item.mime_type)));
        let dir = self.output_dir.join(year_of(&date));
        std::fs::create_dir_all(&dir).map_err(|source| PhotosError::CreateDirError {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(&filename);
        let bytes = fetch(&self.client, &item.download_url(), &path)
            .await
            .map_err(|e| PhotosError::ItemError {
                name: filename.clone(),
                source: Box::new(e),
            })?;

        println!("{} -> {}", filename, path.display());
        Ok(Some(bytes))
    }
}

fn album_name(album: &Album) -> &str {
    if album.title.is_empty() {
        &album.id
    } else {
        &album.title
    }
}

fn parse_creation_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_creation_time() {
        let date = parse_creation_time("2021-07-04T10:15:30Z").unwrap();
        assert_eq!(date.year(), 2021);

        let date = parse_creation_time("2021-07-04T10:15:30.123456789Z").unwrap();
        assert_eq!(date.month(), 7);

        assert!(parse_creation_time("yesterday").is_none());
    }

    #[test]
    fn test_album_name_falls_back_to_id() {
        let album = Album {
            id: "album-1".to_string(),
            title: String::new(),
        };
        assert_eq!(album_name(&album), "album-1");
    }
}
