//! Per-item artwork acquisition.
//!
//! [`ArtworkLoader`] downloads and caches the artwork of a [`CatalogItem`],
//! starting at most one fetch per item at a time. The item's
//! [`DownloadStatus`] is the lock state:
//!
//! | status        | on request                                   |
//! |---------------|----------------------------------------------|
//! | `NotStarted`  | no URL: `NotPossible`; else start a fetch     |
//! | `InProgress`  | join the in-flight fetch, no second request   |
//! | `Complete`    | answer from the cache immediately             |
//! | `Failed`      | retry, exactly like `NotStarted`              |
//! | `NotPossible` | fail immediately                              |
//!
//! Every caller that joins an in-flight fetch is notified with the same
//! outcome as the caller that started it.
//!
//! [`CatalogItem`]: crate::model::CatalogItem
//! [`DownloadStatus`]: crate::model::DownloadStatus

mod loader;

use std::sync::Arc;

pub use loader::ArtworkLoader;

use crate::catalog::CatalogError;
use crate::model::ItemImage;

/// Outcome delivered to artwork callbacks.
pub type ArtworkResult = Result<Arc<ItemImage>, ArtworkError>;

/// Completion callback registered with a request.
pub type ArtworkCallback = Box<dyn FnOnce(ArtworkResult) + Send + 'static>;

/// Errors acquiring an item's artwork.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtworkError {
    /// Item has no artwork URL; terminal for that item
    #[error("Item has no artwork to download")]
    NotPossible,

    /// Asset request failed
    #[error("Artwork download failed: {0}")]
    Fetch(CatalogError),

    /// Bytes were downloaded but are not a decodable image
    #[error("Artwork is not a valid image: {0}")]
    Decode(String),

    /// Requested outside a Tokio runtime; nothing was started
    #[error("No async runtime to download artwork on")]
    NoRuntime,
}

/// What a call to [`ArtworkLoader::request`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Answered from the cached image; callback already invoked
    Cached,
    /// No artwork URL; callback already invoked with an error
    NotPossible,
    /// A new fetch was started
    Started,
    /// A fetch was already in flight; callback queued behind it
    Joined,
    /// No runtime to fetch on; callback already invoked with an error and
    /// the item left as it was
    NoRuntime,
}
