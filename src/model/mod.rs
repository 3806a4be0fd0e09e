//! Core data models shared by the remote catalog and the local store.
//!
//! Defines [`MediaType`], the [`ItemKey`] identity, the per-item
//! [`DownloadStatus`] and the [`CatalogItem`] itself.
//!
//! # Identity
//!
//! A remote search result and a saved record for the same track are two
//! distinct [`CatalogItem`] values. They are matched by [`ItemKey`] equality,
//! never by pointer identity.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::artwork::ArtworkCallback;

/// Kind of media a catalog item belongs to.
///
/// The lowercase variant name is the wire value used for the `media` search
/// parameter and for the stored type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Music,
    Ebook,
    Software,
    Podcast,
}

impl MediaType {
    /// Every media type, in display order.
    pub const ALL: [MediaType; 4] = [
        MediaType::Music,
        MediaType::Ebook,
        MediaType::Software,
        MediaType::Podcast,
    ];

    /// Wire name (`music`, `ebook`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Music => "music",
            MediaType::Ebook => "ebook",
            MediaType::Software => "software",
            MediaType::Podcast => "podcast",
        }
    }

    /// Capitalized label for display.
    pub fn title(&self) -> &'static str {
        match self {
            MediaType::Music => "Music",
            MediaType::Ebook => "Ebook",
            MediaType::Software => "Software",
            MediaType::Podcast => "Podcast",
        }
    }

    /// Search term used when the user has not entered one.
    pub fn default_search_term(&self) -> &'static str {
        match self {
            MediaType::Music => "It's my life",
            MediaType::Ebook => "Fifty Shades of Grey",
            MediaType::Software => "App Store Connect",
            MediaType::Podcast => "Something interesting",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown media type: {s}"))
    }
}

/// Identity of a catalog item: track ids are only unique within a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub media_type: MediaType,
    pub track_id: i64,
}

impl ItemKey {
    pub fn new(media_type: MediaType, track_id: i64) -> Self {
        Self {
            media_type,
            track_id,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.track_id)
    }
}

/// Artwork download state of a single item.
///
/// The status doubles as the in-flight lock: a fetch is only ever started by
/// the request that moves the item into [`DownloadStatus::InProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    Failed,
    /// No artwork URL; terminal.
    NotPossible,
}

/// Where an in-memory item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Parsed from a catalog search result
    Remote,
    /// Loaded from the local item store
    Local,
}

/// A decoded artwork image.
#[derive(Debug, Clone)]
pub struct ItemImage {
    image: image::DynamicImage,
}

impl ItemImage {
    /// Decode raw bytes (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        image::load_from_memory(bytes).map(Self::from)
    }

    pub fn image(&self) -> &image::DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl From<image::DynamicImage> for ItemImage {
    fn from(image: image::DynamicImage) -> Self {
        Self { image }
    }
}

/// Status and cached image, always read and written together.
pub(crate) struct ArtworkState {
    pub(crate) status: DownloadStatus,
    pub(crate) image: Option<Arc<ItemImage>>,
    /// Callbacks waiting on the in-flight fetch
    pub(crate) waiters: Vec<ArtworkCallback>,
}

/// One media record (track, book, app or podcast).
///
/// Descriptive fields are immutable; only the artwork state changes, and
/// only through the acquisition engine in [`crate::artwork`].
pub struct CatalogItem {
    key: ItemKey,
    track_name: String,
    artist_name: String,
    artwork_url: Option<String>,
    origin: ItemOrigin,
    pub(crate) artwork: Mutex<ArtworkState>,
}

impl CatalogItem {
    /// Create an item parsed from a search result.
    pub fn remote(
        key: ItemKey,
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        artwork_url: Option<String>,
    ) -> Self {
        Self::build(
            key,
            track_name.into(),
            artist_name.into(),
            artwork_url,
            ItemOrigin::Remote,
            None,
        )
    }

    /// Create an item loaded from the local store.
    ///
    /// Local items have no artwork URL. When an image is present the item
    /// starts out `Complete`, so requests are answered from the cache.
    pub fn local(
        key: ItemKey,
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        image: Option<ItemImage>,
    ) -> Self {
        Self::build(
            key,
            track_name.into(),
            artist_name.into(),
            None,
            ItemOrigin::Local,
            image.map(Arc::new),
        )
    }

    fn build(
        key: ItemKey,
        track_name: String,
        artist_name: String,
        artwork_url: Option<String>,
        origin: ItemOrigin,
        image: Option<Arc<ItemImage>>,
    ) -> Self {
        let status = if image.is_some() {
            DownloadStatus::Complete
        } else {
            DownloadStatus::NotStarted
        };

        Self {
            key,
            track_name,
            artist_name,
            artwork_url,
            origin,
            artwork: Mutex::new(ArtworkState {
                status,
                image,
                waiters: Vec::new(),
            }),
        }
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn media_type(&self) -> MediaType {
        self.key.media_type
    }

    pub fn track_id(&self) -> i64 {
        self.key.track_id
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }

    pub fn origin(&self) -> ItemOrigin {
        self.origin
    }

    pub fn download_status(&self) -> DownloadStatus {
        self.artwork.lock().status
    }

    /// Cached artwork, if downloaded.
    pub fn image(&self) -> Option<Arc<ItemImage>> {
        self.artwork.lock().image.clone()
    }

    /// Status and image read under one lock acquisition.
    pub fn artwork_snapshot(&self) -> (DownloadStatus, Option<Arc<ItemImage>>) {
        let state = self.artwork.lock();
        (state.status, state.image.clone())
    }

    /// Drop the cached image so the next request downloads it again.
    ///
    /// Has no effect while a fetch is in flight.
    pub fn clear_artwork(&self) {
        let mut state = self.artwork.lock();
        if state.status == DownloadStatus::Complete {
            state.image = None;
            state.status = DownloadStatus::NotStarted;
        }
    }
}

impl fmt::Debug for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogItem")
            .field("key", &self.key)
            .field("track_name", &self.track_name)
            .field("artist_name", &self.artist_name)
            .field("artwork_url", &self.artwork_url)
            .field("origin", &self.origin)
            .field("status", &self.download_status())
            .finish()
    }
}
