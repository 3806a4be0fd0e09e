//! Catalog session: one search, one result set.
//!
//! A [`CatalogSession`] runs a search against the remote catalog and holds
//! the resulting items. Each successful refresh swaps in a whole new
//! [`ResultSet`]; readers holding the previous snapshot keep a consistent
//! view of it until they drop it. A failed refresh leaves the current set
//! untouched.
//!
//! Refreshes are not de-duplicated: when two overlap, whichever response
//! lands last wins.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{ArtworkSize, CatalogApi, adapter};
use crate::error::Result;
use crate::model::{CatalogItem, MediaType};

/// Items produced by one refresh.
#[derive(Debug)]
pub struct ResultSet {
    media_type: MediaType,
    query: String,
    items: Arc<[Arc<CatalogItem>]>,
    generation: u64,
}

impl ResultSet {
    fn empty() -> Self {
        Self {
            media_type: MediaType::default(),
            query: String::new(),
            items: Arc::from(Vec::new()),
            generation: 0,
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Term that was actually searched for.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &Arc<[Arc<CatalogItem>]> {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CatalogItem>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of successful refreshes this set is the result of.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the current search results for a `(media type, query)` pair.
pub struct CatalogSession<C: ?Sized> {
    client: Arc<C>,
    artwork_size: ArtworkSize,
    current: RwLock<Arc<ResultSet>>,
}

impl<C> CatalogSession<C>
where
    C: CatalogApi + ?Sized,
{
    pub fn new(client: Arc<C>) -> Self {
        Self::with_artwork_size(client, ArtworkSize::default())
    }

    /// Create a session that reads the given artwork field from results.
    pub fn with_artwork_size(client: Arc<C>, artwork_size: ArtworkSize) -> Self {
        Self {
            client,
            artwork_size,
            current: RwLock::new(Arc::new(ResultSet::empty())),
        }
    }

    /// Search `media_type` for `query` and replace the held result set.
    ///
    /// A blank query searches the media type's default term. Returns the
    /// number of items kept after invalid results were dropped.
    pub async fn refresh(&self, media_type: MediaType, query: &str) -> Result<usize> {
        let term = if query.trim().is_empty() {
            media_type.default_search_term()
        } else {
            query
        };

        let raw = self.client.search(media_type, term).await.map_err(|e| {
            tracing::warn!(%media_type, term, error = %e, "Refresh failed");
            e
        })?;
        let items = adapter::to_items(media_type, &raw, self.artwork_size)?;
        let count = items.len();

        let items: Arc<[Arc<CatalogItem>]> = items.into_iter().map(Arc::new).collect();

        let generation = {
            let mut current = self.current.write();
            let generation = current.generation + 1;
            *current = Arc::new(ResultSet {
                media_type,
                query: term.to_string(),
                items,
                generation,
            });
            generation
        };

        tracing::info!(%media_type, term, count, generation, "Catalog refreshed");
        Ok(count)
    }

    /// The current result set.
    pub fn snapshot(&self) -> Arc<ResultSet> {
        self.current.read().clone()
    }

    /// Items of the current result set.
    pub fn items(&self) -> Arc<[Arc<CatalogItem>]> {
        Arc::clone(self.current.read().items())
    }

    /// Item at `index` in the current result set.
    pub fn item_at(&self, index: usize) -> Option<Arc<CatalogItem>> {
        self.current.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    pub fn media_type(&self) -> MediaType {
        self.current.read().media_type()
    }

    pub fn query(&self) -> String {
        self.current.read().query().to_string()
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::catalog::traits::mocks::MockCatalog;
    use crate::error::Error;
    use serde_json::json;

    fn session(mock: MockCatalog) -> (CatalogSession<MockCatalog>, Arc<MockCatalog>) {
        let mock = Arc::new(mock);
        (CatalogSession::new(Arc::clone(&mock)), mock)
    }

    fn two_valid() -> serde_json::Value {
        json!({
            "resultCount": 2,
            "results": [
                { "trackId": 1, "trackName": "One", "artistName": "A", "artworkUrl60": "https://a/1.jpg" },
                { "trackId": 2, "trackName": "Two", "artistName": "B" }
            ]
        })
    }

    #[tokio::test]
    async fn test_refresh_drops_invalid_items() {
        let (session, _) = session(MockCatalog::with_search(json!({
            "results": [
                { "trackName": "Missing id", "artistName": "X" },
                { "trackId": 5, "trackName": "Valid", "artistName": "Y" }
            ]
        })));

        let count = session.refresh(MediaType::Music, "test").await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(session.len(), 1);
        assert_eq!(session.item_at(0).unwrap().track_name(), "Valid");
    }

    #[tokio::test]
    async fn test_blank_query_uses_default_term() {
        let (session, mock) = session(MockCatalog::with_search(two_valid()));

        session.refresh(MediaType::Ebook, "   ").await.unwrap();

        let searches = mock.searches.lock().clone();
        assert_eq!(searches, vec![(MediaType::Ebook, "Fifty Shades of Grey".to_string())]);
        assert_eq!(session.query(), "Fifty Shades of Grey");
        assert_eq!(session.media_type(), MediaType::Ebook);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_previous_items() {
        let (session, mock) = session(MockCatalog::with_search(two_valid()));
        session.refresh(MediaType::Music, "first").await.unwrap();
        let before = session.items();

        mock.set_search(Err(CatalogError::Transport("HTTP 503: Service Unavailable".into())));
        let err = session.refresh(MediaType::Music, "second").await.unwrap_err();

        assert!(matches!(err, Error::Catalog(CatalogError::Transport(_))));
        assert_eq!(session.generation(), 1);
        assert_eq!(session.query(), "first");
        assert!(Arc::ptr_eq(&before, &session.items()));
    }

    #[tokio::test]
    async fn test_first_refresh_failure_leaves_empty_set() {
        let (session, mock) = session(MockCatalog::with_search_error(CatalogError::Transport(
            "connection refused".into(),
        )));

        let err = session.refresh(MediaType::Podcast, "news").await.unwrap_err();

        assert!(matches!(err, Error::Catalog(CatalogError::Transport(_))));
        assert!(session.is_empty());
        assert_eq!(session.generation(), 0);
        assert_eq!(mock.searches.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_keeps_previous_items() {
        let (session, mock) = session(MockCatalog::with_search(two_valid()));
        session.refresh(MediaType::Music, "first").await.unwrap();

        mock.set_search(Ok(json!({ "errorMessage": "Invalid value(s) for key(s): [mediaType]" })));
        let err = session.refresh(MediaType::Music, "second").await.unwrap_err();

        assert!(matches!(err, Error::Catalog(CatalogError::MalformedResponse(_))));
        assert_eq!(session.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_set() {
        let (session, mock) = session(MockCatalog::with_search(two_valid()));
        session.refresh(MediaType::Music, "first").await.unwrap();
        let old = session.snapshot();

        mock.set_search(Ok(json!({
            "results": [{ "trackId": 1, "trackName": "One again", "artistName": "A" }]
        })));
        session.refresh(MediaType::Music, "second").await.unwrap();

        // The held snapshot is untouched
        assert_eq!(old.len(), 2);
        assert_eq!(old.generation(), 1);

        let new = session.snapshot();
        assert_eq!(new.len(), 1);
        assert_eq!(new.generation(), 2);
        // Same key, but a fresh item object
        assert_eq!(new.get(0).unwrap().key(), old.get(0).unwrap().key());
        assert!(!Arc::ptr_eq(new.get(0).unwrap(), old.get(0).unwrap()));
    }

    #[tokio::test]
    async fn test_empty_results_is_success() {
        let (session, _) = session(MockCatalog::with_search(json!({ "resultCount": 0, "results": [] })));
        assert_eq!(session.refresh(MediaType::Software, "zzzz").await.unwrap(), 0);
        assert!(session.is_empty());
        assert_eq!(session.generation(), 1);
    }

    #[tokio::test]
    async fn test_artwork_size_is_applied() {
        let mock = Arc::new(MockCatalog::with_search(json!({
            "results": [{
                "trackId": 1, "trackName": "A", "artistName": "B",
                "artworkUrl60": "https://a/60.jpg", "artworkUrl100": "https://a/100.jpg"
            }]
        })));
        let session = CatalogSession::with_artwork_size(mock, ArtworkSize::Medium);

        session.refresh(MediaType::Music, "a").await.unwrap();
        assert_eq!(session.item_at(0).unwrap().artwork_url(), Some("https://a/100.jpg"));
    }
}
