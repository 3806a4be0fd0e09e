//! Catalog Browser - browse the iTunes Search catalog and keep items offline.
//!
//! Searches are run per media type through a [`session::CatalogSession`].
//! Item artwork is downloaded lazily and exactly once per item by
//! [`artwork::ArtworkLoader`], and items can be saved to a local SQLite store
//! with a grayscale copy of their artwork through [`reconcile::Reconciler`].

pub mod artwork;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod test_utils;
