//! Adapter layer: raw search payloads to catalog items
//!
//! This is the ONLY place where search DTOs become [`CatalogItem`]s.

use serde::Deserialize;
use serde_json::Value;

use super::dto::{RawResultSet, SearchResult};
use super::{ArtworkSize, CatalogError};
use crate::model::{CatalogItem, ItemKey, MediaType};

/// Convert a search payload into items of `media_type`.
///
/// Fails only when the payload has no `results` array. Elements missing a
/// required field are skipped.
pub fn to_items(
    media_type: MediaType,
    raw: &RawResultSet,
    artwork_size: ArtworkSize,
) -> Result<Vec<CatalogItem>, CatalogError> {
    let results = raw
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CatalogError::MalformedResponse("response has no results array".to_string())
        })?;

    let items: Vec<CatalogItem> = results
        .iter()
        .filter_map(|value| match SearchResult::deserialize(value) {
            Ok(result) => Some(convert_result(media_type, result, artwork_size)),
            Err(e) => {
                tracing::trace!(error = %e, "Skipping unparseable search result");
                None
            }
        })
        .collect();

    if items.len() < results.len() {
        tracing::debug!(
            kept = items.len(),
            skipped = results.len() - items.len(),
            "Dropped invalid search results"
        );
    }

    Ok(items)
}

fn convert_result(
    media_type: MediaType,
    result: SearchResult,
    artwork_size: ArtworkSize,
) -> CatalogItem {
    let (preferred, fallback) = match artwork_size {
        ArtworkSize::Small => (&result.artwork_url_60, &result.artwork_url_100),
        ArtworkSize::Medium => (&result.artwork_url_100, &result.artwork_url_60),
    };
    let artwork_url = url_field(preferred).or_else(|| url_field(fallback));

    CatalogItem::remote(
        ItemKey::new(media_type, result.track_id),
        result.track_name,
        result.artist_name,
        artwork_url,
    )
}

/// A wrong-typed or empty artwork field counts as absent.
fn url_field(value: &Option<Value>) -> Option<String> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_results_is_malformed() {
        let raw = json!({ "resultCount": 0 });
        let err = to_items(MediaType::Music, &raw, ArtworkSize::Small).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[test]
    fn test_results_not_array_is_malformed() {
        let raw = json!({ "results": "nope" });
        assert!(to_items(MediaType::Music, &raw, ArtworkSize::Small).is_err());
    }

    #[test]
    fn test_invalid_elements_are_skipped() {
        let raw = json!({
            "results": [
                { "trackName": "No id", "artistName": "X" },
                { "trackId": 2, "trackName": "Valid", "artistName": "Y" },
                { "trackId": 3, "artistName": "No name" },
                42
            ]
        });

        let items = to_items(MediaType::Music, &raw, ArtworkSize::Small).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].track_id(), 2);
        assert_eq!(items[0].media_type(), MediaType::Music);
    }

    #[test]
    fn test_items_tagged_with_requested_type() {
        let raw = json!({
            "results": [{ "trackId": 9, "trackName": "Pod", "artistName": "Host" }]
        });
        let items = to_items(MediaType::Podcast, &raw, ArtworkSize::Small).unwrap();
        assert_eq!(items[0].key(), ItemKey::new(MediaType::Podcast, 9));
    }

    #[test]
    fn test_artwork_size_preference_and_fallback() {
        let raw = json!({
            "results": [
                {
                    "trackId": 1, "trackName": "A", "artistName": "B",
                    "artworkUrl60": "https://a/60.jpg",
                    "artworkUrl100": "https://a/100.jpg"
                },
                {
                    "trackId": 2, "trackName": "C", "artistName": "D",
                    "artworkUrl60": "https://c/60.jpg"
                }
            ]
        });

        let items = to_items(MediaType::Music, &raw, ArtworkSize::Medium).unwrap();
        assert_eq!(items[0].artwork_url(), Some("https://a/100.jpg"));
        assert_eq!(items[1].artwork_url(), Some("https://c/60.jpg"));

        let items = to_items(MediaType::Music, &raw, ArtworkSize::Small).unwrap();
        assert_eq!(items[0].artwork_url(), Some("https://a/60.jpg"));
    }

    #[test]
    fn test_wrong_typed_artwork_is_absent() {
        let raw = json!({
            "results": [{ "trackId": 1, "trackName": "A", "artistName": "B", "artworkUrl60": 60 }]
        });
        let items = to_items(MediaType::Music, &raw, ArtworkSize::Small).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].artwork_url().is_none());
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = json!({
            "results": [
                { "trackId": 3, "trackName": "Z", "artistName": "a" },
                { "trackId": 1, "trackName": "A", "artistName": "b" }
            ]
        });
        let items = to_items(MediaType::Music, &raw, ArtworkSize::Small).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.track_id()).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
