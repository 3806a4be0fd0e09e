//! Local item store for saved catalog items.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. Records are keyed
//! by `(media type, track id)`; the store serializes its own access through
//! the connection pool.
//!
//! # Example
//!
//! ```ignore
//! use catalog_browser::store::{ItemStore, SqliteItemStore};
//!
//! let store = SqliteItemStore::open(Path::new("saved_items.db")).await?;
//! let music = store.list_sorted(MediaType::Music).await?;
//! ```

mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{ItemKey, MediaType};

pub use sqlite::{SqliteItemStore, db_url, init_db};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "saved_items.db";

/// A persisted item.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedItemRecord {
    pub key: ItemKey,
    pub track_name: String,
    pub artist_name: String,
    /// Encoded (grayscale PNG) artwork, if the item had any when saved
    pub image: Option<Vec<u8>>,
    /// Last time the record was written
    pub saved_at: DateTime<Utc>,
}

/// Persistence surface consumed by the reconciliation layer.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Exact key lookup.
    async fn find(&self, key: ItemKey) -> Result<Option<SavedItemRecord>>;

    /// Insert, or overwrite the record with the same key.
    ///
    /// Returns true if an existing record was overwritten.
    async fn upsert(&self, record: &SavedItemRecord) -> Result<bool>;

    /// Remove a record. Returns false if there was none.
    async fn delete(&self, key: ItemKey) -> Result<bool>;

    /// All records of one type, by track name ascending (case-insensitive).
    async fn list_sorted(&self, media_type: MediaType) -> Result<Vec<SavedItemRecord>>;

    /// Total number of records.
    async fn count(&self) -> Result<i64>;
}
