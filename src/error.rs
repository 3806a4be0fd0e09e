//! Library-wide error types.
//!
//! Each layer has its own `thiserror` enum ([`CatalogError`] for the remote
//! catalog, [`ArtworkError`] for image acquisition); [`Error`] aggregates
//! them together with storage and record failures. The binary uses
//! `anyhow` on top of this.
//!
//! # Propagation
//!
//! - A single search result that fails to parse is dropped, not reported.
//! - [`CatalogError`] fails a whole refresh and keeps the previous list.
//! - [`ArtworkError`] only reaches the callers waiting on that item's fetch.
//!
//! [`CatalogError`]: crate::catalog::CatalogError
//! [`ArtworkError`]: crate::artwork::ArtworkError

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Search or asset request failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// Artwork could not be acquired
    #[error("Artwork error: {0}")]
    Artwork(#[from] crate::artwork::ArtworkError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Image transform or encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored record that cannot be turned back into an item
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}
