//! Reconciliation between remote items and the local item store.
//!
//! Remote and local items are matched by [`ItemKey`]. Saving writes through
//! the store with the artwork downgraded to grayscale; listing and lookups
//! turn stored records back into local [`CatalogItem`]s.

mod downgrade;

use std::sync::Arc;

use chrono::Utc;

pub use downgrade::downgrade;

use crate::error::{Error, Result};
use crate::model::{CatalogItem, ItemImage, ItemKey, MediaType};
use crate::store::{ItemStore, SavedItemRecord};

/// What [`Reconciler::save_or_update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No record with this key existed
    Created,
    /// An existing record was overwritten
    Updated,
}

/// Bridges catalog items and an [`ItemStore`].
pub struct Reconciler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> Reconciler<S>
where
    S: ItemStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The local copy of `(media_type, track_id)`, if saved.
    pub async fn find_local(
        &self,
        media_type: MediaType,
        track_id: i64,
    ) -> Result<Option<Arc<CatalogItem>>> {
        let record = self
            .store
            .find(ItemKey::new(media_type, track_id))
            .await?;
        Ok(record.map(record_to_item))
    }

    /// Whether an item with the same key is saved locally.
    pub async fn is_saved(&self, item: &CatalogItem) -> Result<bool> {
        Ok(self.store.find(item.key()).await?.is_some())
    }

    /// Save `item`, or overwrite the saved record with the same key.
    ///
    /// The stored artwork is a grayscale copy of the item's current image,
    /// or nothing if the item has no image yet.
    pub async fn save_or_update(&self, item: &CatalogItem) -> Result<SaveOutcome> {
        let key = item.key();

        let image = match item.image() {
            Some(image) => Some(downgrade_off_thread(image).await?),
            None => None,
        };

        let record = SavedItemRecord {
            key,
            track_name: item.track_name().to_string(),
            artist_name: item.artist_name().to_string(),
            image,
            saved_at: Utc::now(),
        };
        let replaced = self.store.upsert(&record).await?;

        let outcome = if replaced {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        tracing::info!(%key, ?outcome, has_image = record.image.is_some(), "Saved item");
        Ok(outcome)
    }

    /// Remove the saved record with `item`'s key.
    ///
    /// Deleting an item that is not saved is a no-op and returns false.
    pub async fn delete(&self, item: &CatalogItem) -> Result<bool> {
        let removed = self.store.delete(item.key()).await?;
        if removed {
            tracing::info!(key = %item.key(), "Deleted saved item");
        } else {
            tracing::debug!(key = %item.key(), "Delete of unsaved item ignored");
        }
        Ok(removed)
    }

    /// Saved items of one type, by track name ascending.
    pub async fn list_saved(&self, media_type: MediaType) -> Result<Vec<Arc<CatalogItem>>> {
        let records = self.store.list_sorted(media_type).await?;
        Ok(records.into_iter().map(record_to_item).collect())
    }
}

async fn downgrade_off_thread(image: Arc<ItemImage>) -> Result<Vec<u8>> {
    let bytes = tokio::task::spawn_blocking(move || downgrade(&image))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;
    Ok(bytes)
}

/// Undecodable stored artwork is dropped rather than failing the lookup.
fn record_to_item(record: SavedItemRecord) -> Arc<CatalogItem> {
    let image = record
        .image
        .as_deref()
        .and_then(|bytes| match ItemImage::decode(bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(key = %record.key, error = %e, "Stored artwork is unreadable");
                None
            }
        });

    Arc::new(CatalogItem::local(
        record.key,
        record.track_name,
        record.artist_name,
        image,
    ))
}
