//! The acquisition state machine.
//!
//! Status transitions, the cached image and the waiter list of an item are
//! all guarded by that item's own lock, never a loader-wide one, so unrelated
//! downloads proceed in parallel. Callbacks always run after the lock is
//! released.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use super::{ArtworkError, ArtworkResult, RequestOutcome};
use crate::catalog::{CatalogApi, CatalogError};
use crate::model::{CatalogItem, DownloadStatus, ItemImage};

/// Downloads and caches item artwork through a [`CatalogApi`].
///
/// Fetches are spawned on the current Tokio runtime. Outside one, `request`
/// answers with [`ArtworkError::NoRuntime`] and leaves the item untouched.
pub struct ArtworkLoader<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> Clone for ArtworkLoader<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C> ArtworkLoader<C>
where
    C: CatalogApi + ?Sized + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Request the artwork of `item`.
    ///
    /// `on_done` is invoked exactly once: immediately for cached and
    /// not-possible items, otherwise when the (new or already running) fetch
    /// finishes.
    pub fn request<F>(&self, item: &Arc<CatalogItem>, on_done: F) -> RequestOutcome
    where
        F: FnOnce(ArtworkResult) + Send + 'static,
    {
        let mut state = item.artwork.lock();

        match state.status {
            DownloadStatus::Complete if state.image.is_some() => {
                let image = state.image.clone();
                drop(state);
                if let Some(image) = image {
                    on_done(Ok(image));
                }
                return RequestOutcome::Cached;
            }
            DownloadStatus::NotPossible => {
                drop(state);
                on_done(Err(ArtworkError::NotPossible));
                return RequestOutcome::NotPossible;
            }
            DownloadStatus::InProgress => {
                state.waiters.push(Box::new(on_done));
                tracing::trace!(key = %item.key(), waiters = state.waiters.len(), "Joined in-flight artwork fetch");
                return RequestOutcome::Joined;
            }
            // NotStarted, Failed, or Complete without an image
            _ => {}
        }

        let Some(url) = item.artwork_url().map(str::to_string) else {
            state.status = DownloadStatus::NotPossible;
            drop(state);
            tracing::debug!(key = %item.key(), "No artwork URL, marking not possible");
            on_done(Err(ArtworkError::NotPossible));
            return RequestOutcome::NotPossible;
        };

        // Checked before the transition so an item is never left InProgress
        // with no task behind it
        let Ok(runtime) = Handle::try_current() else {
            drop(state);
            tracing::warn!(key = %item.key(), "Artwork requested outside a runtime");
            on_done(Err(ArtworkError::NoRuntime));
            return RequestOutcome::NoRuntime;
        };

        let retry = state.status == DownloadStatus::Failed;
        state.status = DownloadStatus::InProgress;
        state.waiters.push(Box::new(on_done));
        drop(state);

        tracing::debug!(key = %item.key(), %url, retry, "Starting artwork fetch");
        self.spawn_fetch(&runtime, Arc::clone(item), url);
        RequestOutcome::Started
    }

    /// Request the artwork of `item` and wait for the outcome.
    pub async fn acquire(&self, item: &Arc<CatalogItem>) -> ArtworkResult {
        let (tx, rx) = oneshot::channel();
        self.request(item, move |result| {
            let _ = tx.send(result);
        });

        rx.await.unwrap_or_else(|_| {
            Err(ArtworkError::Fetch(CatalogError::Transport(
                "artwork fetch ended without a result".to_string(),
            )))
        })
    }

    fn spawn_fetch(&self, runtime: &Handle, item: Arc<CatalogItem>, url: String) {
        let client = Arc::clone(&self.client);
        runtime.spawn(async move {
            let result = fetch_and_decode(client.as_ref(), &url).await;
            finish(&item, result);
        });
    }
}

async fn fetch_and_decode<C>(client: &C, url: &str) -> ArtworkResult
where
    C: CatalogApi + ?Sized,
{
    let bytes = client
        .fetch_asset(url)
        .await
        .map_err(ArtworkError::Fetch)?;

    // Decoding is CPU work, keep it off the async workers
    let image = tokio::task::spawn_blocking(move || ItemImage::decode(&bytes))
        .await
        .map_err(|e| ArtworkError::Decode(e.to_string()))?
        .map_err(|e| ArtworkError::Decode(e.to_string()))?;

    Ok(Arc::new(image))
}

/// Publish a fetch result and notify every waiter.
///
/// The image is stored in the same critical section that sets `Complete`.
fn finish(item: &CatalogItem, result: ArtworkResult) {
    let waiters = {
        let mut state = item.artwork.lock();
        match &result {
            Ok(image) => {
                state.image = Some(Arc::clone(image));
                state.status = DownloadStatus::Complete;
            }
            Err(_) => {
                state.status = DownloadStatus::Failed;
            }
        }
        std::mem::take(&mut state.waiters)
    };

    match &result {
        Ok(image) => tracing::debug!(
            key = %item.key(),
            width = image.width(),
            height = image.height(),
            waiters = waiters.len(),
            "Artwork fetch complete"
        ),
        Err(e) => tracing::warn!(key = %item.key(), error = %e, "Artwork fetch failed"),
    }

    for waiter in waiters {
        waiter(result.clone());
    }
}
