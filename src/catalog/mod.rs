//! Remote media catalog (iTunes Search API).
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - exact shape of a search result element
//! - **Adapter** (`adapter.rs`) - raw result set to [`CatalogItem`]s
//! - **Client** (`client.rs`) - reqwest implementation
//! - **Traits** (`traits.rs`) - the [`CatalogApi`] seam the rest of the
//!   crate depends on, plus mocks for tests
//!
//! [`CatalogItem`]: crate::model::CatalogItem

pub mod adapter;
mod client;
pub mod dto;
pub mod traits;

use serde::{Deserialize, Serialize};

pub use client::{DEFAULT_BASE_URL, ItunesClient};
pub use dto::RawResultSet;
pub use traits::CatalogApi;

/// Errors reported by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Network failure, non-2xx status or an unreadable payload
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload was JSON but not shaped like a search response
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Which artwork thumbnail field to read from search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkSize {
    /// `artworkUrl60` (default)
    #[default]
    Small,
    /// `artworkUrl100`
    Medium,
}
