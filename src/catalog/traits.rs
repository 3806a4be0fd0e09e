//! The remote catalog seam.
//!
//! Sessions and the artwork loader only ever see [`CatalogApi`]. Production
//! code uses [`ItunesClient`]; tests substitute the mocks below.
//!
//! [`ItunesClient`]: super::ItunesClient

use async_trait::async_trait;

use super::{CatalogError, RawResultSet};
use crate::model::MediaType;

/// Search and asset fetch against the remote catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search one media type for a free-text term.
    async fn search(
        &self,
        media_type: MediaType,
        term: &str,
    ) -> Result<RawResultSet, CatalogError>;

    /// Download raw bytes from an asset URL.
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

#[async_trait]
impl CatalogApi for super::ItunesClient {
    async fn search(
        &self,
        media_type: MediaType,
        term: &str,
    ) -> Result<RawResultSet, CatalogError> {
        self.search(media_type, term).await
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.fetch_asset(url).await
    }
}

/// Mock catalog for testing.
///
/// Returns configurable responses and counts calls.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use tokio::sync::Semaphore;

    /// Mock catalog returning predefined search payloads and assets.
    #[derive(Default)]
    pub struct MockCatalog {
        /// Payload returned by `search` (error takes precedence)
        pub search_result: Mutex<Option<Result<RawResultSet, CatalogError>>>,
        /// Asset bytes per URL; unknown URLs fail with a transport error
        pub assets: Mutex<HashMap<String, Result<Vec<u8>, CatalogError>>>,
        /// When set, `fetch_asset` waits for a permit before answering
        pub fetch_gate: Option<Arc<Semaphore>>,
        /// (media, term) of every search call
        pub searches: Mutex<Vec<(MediaType, String)>>,
        fetch_calls: AtomicUsize,
    }

    impl MockCatalog {
        /// Mock whose search returns `payload`.
        pub fn with_search(payload: RawResultSet) -> Self {
            let mock = Self::default();
            *mock.search_result.lock() = Some(Ok(payload));
            mock
        }

        /// Mock whose search fails.
        pub fn with_search_error(error: CatalogError) -> Self {
            let mock = Self::default();
            *mock.search_result.lock() = Some(Err(error));
            mock
        }

        /// Mock whose asset fetches block until the returned gate gets permits.
        pub fn gated() -> (Self, Arc<Semaphore>) {
            let gate = Arc::new(Semaphore::new(0));
            let mock = Self {
                fetch_gate: Some(Arc::clone(&gate)),
                ..Self::default()
            };
            (mock, gate)
        }

        /// Register the response for an asset URL.
        pub fn add_asset(&self, url: &str, result: Result<Vec<u8>, CatalogError>) {
            self.assets.lock().insert(url.to_string(), result);
        }

        /// Replace the search response.
        pub fn set_search(&self, result: Result<RawResultSet, CatalogError>) {
            *self.search_result.lock() = Some(result);
        }

        /// Number of `fetch_asset` calls so far.
        pub fn fetch_count(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search(
            &self,
            media_type: MediaType,
            term: &str,
        ) -> Result<RawResultSet, CatalogError> {
            self.searches.lock().push((media_type, term.to_string()));
            self.search_result
                .lock()
                .clone()
                .unwrap_or_else(|| Err(CatalogError::Transport("no search configured".into())))
        }

        async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(gate) = &self.fetch_gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| CatalogError::Transport(e.to_string()))?;
                permit.forget();
            }

            self.assets
                .lock()
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(CatalogError::Transport(format!("HTTP 404: {url}"))))
        }
    }
}
