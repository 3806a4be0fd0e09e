//! Display slots and the stale-result guard.
//!
//! A list view reuses a small number of slots (rows) for many items. Each
//! time a slot is bound to an item it gets a fresh [`SlotTicket`]; an artwork
//! result is applied only while its ticket is still the slot's current one.
//! Results for a slot that has since been rebound or released are dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::artwork::{ArtworkLoader, RequestOutcome};
use crate::catalog::CatalogApi;
use crate::model::{CatalogItem, ItemImage};

/// One binding of a slot to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket {
    slot: usize,
    token: u64,
}

impl SlotTicket {
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// What a slot should show for an item's artwork.
#[derive(Debug, Clone)]
pub enum ArtworkView {
    Image(Arc<ItemImage>),
    /// Shown for every failure, including items without artwork
    Placeholder,
}

impl ArtworkView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Current ticket of every bound slot.
#[derive(Debug, Default)]
pub struct SlotTable {
    next_token: AtomicU64,
    bound: Mutex<HashMap<usize, u64>>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `slot` to a new item, invalidating its previous ticket.
    pub fn bind(&self, slot: usize) -> SlotTicket {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.bound.lock().insert(slot, token);
        SlotTicket { slot, token }
    }

    pub fn is_current(&self, ticket: &SlotTicket) -> bool {
        self.bound.lock().get(&ticket.slot) == Some(&ticket.token)
    }

    /// Run `f` only if `ticket` is still current, holding the table lock
    /// throughout so no rebind can land between the check and `f`.
    ///
    /// `f` must not call back into this table.
    pub fn apply_if_current<F: FnOnce()>(&self, ticket: &SlotTicket, f: F) -> bool {
        let bound = self.bound.lock();
        if bound.get(&ticket.slot) != Some(&ticket.token) {
            return false;
        }
        f();
        true
    }

    /// Unbind `slot`; pending results for it are dropped.
    pub fn release(&self, slot: usize) {
        self.bound.lock().remove(&slot);
    }

    /// Bind `slot` to `item` and request its artwork.
    ///
    /// `apply` receives the slot and the view to show, unless the slot was
    /// rebound or released before the artwork arrived. It runs under the
    /// table lock and must not bind or release slots itself.
    pub fn load_artwork<C, F>(
        self: &Arc<Self>,
        loader: &ArtworkLoader<C>,
        slot: usize,
        item: &Arc<CatalogItem>,
        apply: F,
    ) -> RequestOutcome
    where
        C: CatalogApi + ?Sized + 'static,
        F: FnOnce(usize, ArtworkView) + Send + 'static,
    {
        let ticket = self.bind(slot);
        let table = Arc::clone(self);
        let key = item.key();

        loader.request(item, move |result| {
            let view = match result {
                Ok(image) => ArtworkView::Image(image),
                Err(e) => {
                    tracing::debug!(slot, %key, error = %e, "Artwork unavailable");
                    ArtworkView::Placeholder
                }
            };
            if !table.apply_if_current(&ticket, || apply(slot, view)) {
                tracing::trace!(slot, %key, "Dropping artwork for rebound slot");
            }
        })
    }
}
