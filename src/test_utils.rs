//! Test utilities and fixtures for catalog-browser tests.
//!
//! This module provides common test helpers, mock factories, and
//! store utilities to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use catalog_browser::test_utils::{temp_store, mock_record};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (store, _dir) = temp_store().await;
//!     store.upsert(&mock_record(MediaType::Music, 1, "Song")).await.unwrap();
//! }
//! ```

use std::io::Cursor;

use chrono::{TimeZone, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use crate::model::{CatalogItem, ItemKey, MediaType};
use crate::store::{SavedItemRecord, SqliteItemStore};

/// Creates a temporary item store for testing.
///
/// The database lives in a temporary directory that is removed when the
/// returned `TempDir` is dropped. Keep it alive for the duration of the test.
pub async fn temp_store() -> (SqliteItemStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let store = SqliteItemStore::open(&dir.path().join("test.db"))
        .await
        .expect("Failed to initialize test store");

    (store, dir)
}

/// Creates a remote music item named after its track id.
pub fn mock_remote_item(track_id: i64, artwork_url: Option<&str>) -> CatalogItem {
    CatalogItem::remote(
        ItemKey::new(MediaType::Music, track_id),
        format!("Track {track_id}"),
        "Test Artist",
        artwork_url.map(str::to_string),
    )
}

/// Creates a saved record without artwork.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let record = SavedItemRecord {
///     image: Some(bytes),
///     ..mock_record(MediaType::Music, 1, "Song")
/// };
/// ```
pub fn mock_record(media_type: MediaType, track_id: i64, track_name: &str) -> SavedItemRecord {
    SavedItemRecord {
        key: ItemKey::new(media_type, track_id),
        track_name: track_name.to_string(),
        artist_name: "Test Artist".to_string(),
        image: None,
        saved_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

/// Encodes a solid-color PNG.
pub fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)));
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DownloadStatus, ItemImage, ItemOrigin};
    use crate::store::ItemStore;

    #[tokio::test]
    async fn test_temp_store_creates_working_database() {
        let (store, _dir) = temp_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[test]
    fn test_mock_remote_item_defaults() {
        let item = mock_remote_item(42, None);
        assert_eq!(item.track_name(), "Track 42");
        assert_eq!(item.media_type(), MediaType::Music);
        assert_eq!(item.origin(), ItemOrigin::Remote);
        assert_eq!(item.download_status(), DownloadStatus::NotStarted);
    }

    #[test]
    fn test_png_bytes_decode() {
        let image = ItemImage::decode(&png_bytes(5, 3, [1, 2, 3])).unwrap();
        assert_eq!((image.width(), image.height()), (5, 3));
        assert_eq!(image.image().to_rgb8().get_pixel(0, 0).0, [1, 2, 3]);
    }
}
