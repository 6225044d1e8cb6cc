//! Filename and directory naming helpers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, Utc};

/// Last timestamp handed out by `unique_name`.
static LAST_NANOS: AtomicU64 = AtomicU64::new(0);

/// Nanoseconds since the epoch, strictly increasing across calls.
fn next_nanos() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let prev = LAST_NANOS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(0);
    now.max(prev + 1)
}

/// Split a file name into base name and extension (including the dot).
///
/// Only the final path component is considered for the extension.
fn split_extension(original: &str) -> (&str, &str) {
    let name_start = original.rfind('/').map(|i| i + 1).unwrap_or(0);
    match original[name_start..].rfind('.') {
        Some(dot) => original.split_at(name_start + dot),
        None => (original, ""),
    }
}

/// Generate a unique file name by inserting a nanosecond timestamp between
/// the base name and the extension.
///
/// # Examples
///
/// ```
/// use photos_download::sanitize::unique_name;
///
/// let name = unique_name("photo.jpg");
/// assert!(name.starts_with("photo_"));
/// assert!(name.ends_with(".jpg"));
/// ```
pub fn unique_name(original: &str) -> String {
    let (base, ext) = split_extension(original);
    format!("{}_{}{}", base, next_nanos(), ext)
}

/// Four-digit calendar year of a timestamp (UTC).
pub fn year_of(date: &DateTime<Utc>) -> String {
    format!("{:04}", date.year())
}

/// File extension for a media item's MIME type.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => ".png",
        "image/gif" => ".gif",
        _ => ".jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unique_name_keeps_base_and_extension() {
        let name = unique_name("foto.jpg");
        assert!(name.starts_with("foto_"));
        assert!(name.ends_with(".jpg"));

        let stamp = &name["foto_".len()..name.len() - ".jpg".len()];
        assert!(!stamp.is_empty());
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_unique_name_without_extension() {
        let name = unique_name("README");
        assert!(name.starts_with("README_"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_unique_name_only_last_extension() {
        let name = unique_name("archive.tar.gz");
        assert!(name.starts_with("archive.tar_"));
        assert!(name.ends_with(".gz"));
    }

    #[test]
    fn test_split_extension_ignores_directory_dots() {
        assert_eq!(split_extension("dir.d/file"), ("dir.d/file", ""));
        assert_eq!(split_extension("dir.d/file.png"), ("dir.d/file", ".png"));
    }

    #[test]
    fn test_unique_name_is_unique() {
        let names: Vec<String> = (0..1000).map(|_| unique_name("x.png")).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_year_of() {
        let date = Utc.with_ymd_and_hms(2025, 10, 22, 8, 30, 0).unwrap();
        assert_eq!(year_of(&date), "2025");

        let early = Utc.with_ymd_and_hms(987, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(year_of(&early), "0987");
    }

    #[test]
    fn test_year_of_is_utc() {
        let date = DateTime::parse_from_rfc3339("2019-12-31T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(year_of(&date), "2020");
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/png"), ".png");
        assert_eq!(extension_for("image/gif"), ".gif");
        assert_eq!(extension_for("image/jpeg"), ".jpg");
        assert_eq!(extension_for("video/mp4"), ".jpg");
        assert_eq!(extension_for(""), ".jpg");
    }
}
