//! Search API Data Transfer Objects
//!
//! API Reference: https://performance-partners.apple.com/search-api
//!
//! Only the fields this crate reads are modelled. Everything else in a
//! result element is ignored.

use serde::Deserialize;
use serde_json::Value;

/// Top-level search payload exactly as received.
///
/// Kept untyped so the adapter can tell a missing `results` array apart
/// from individual elements that fail to parse.
pub type RawResultSet = Value;

/// A single search result element.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Track id, unique within a media type
    #[serde(rename = "trackId")]
    pub track_id: i64,
    /// Track, book, app or episode name
    #[serde(rename = "trackName")]
    pub track_name: String,
    /// Artist, author or developer
    #[serde(rename = "artistName")]
    pub artist_name: String,
    /// 60px thumbnail URL (type not trusted)
    #[serde(rename = "artworkUrl60", default)]
    pub artwork_url_60: Option<Value>,
    /// 100px thumbnail URL (type not trusted)
    #[serde(rename = "artworkUrl100", default)]
    pub artwork_url_100: Option<Value>,
}
