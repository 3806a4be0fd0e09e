//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `browse`: remote search and saved-item listing
//! - `library`: saving and deleting local items

mod browse;
mod library;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::artwork::ArtworkLoader;
use crate::catalog::ItunesClient;
use crate::config::{self, Config};
use crate::model::{CatalogItem, MediaType};
use crate::reconcile::Reconciler;
use crate::session::CatalogSession;
use crate::store::SqliteItemStore;

pub use browse::{cmd_saved, cmd_search};
pub use library::{cmd_delete, cmd_save};

/// Catalog Browser CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database path (overrides the configured one)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the remote catalog
    Search {
        /// Media type: music, ebook, software or podcast (default: last used)
        #[arg(short, long)]
        media: Option<MediaType>,
        /// Search term (default: last search, or the media type's default)
        query: Option<String>,
        /// Download the artwork of every result
        #[arg(long)]
        artwork: bool,
    },
    /// List saved items, sorted by name
    Saved {
        /// Media type (default: last used)
        #[arg(short, long)]
        media: Option<MediaType>,
    },
    /// Save a search result locally, or update its saved copy
    Save {
        #[arg(short, long)]
        media: MediaType,
        /// Track id of the item in the search results
        #[arg(short, long)]
        track_id: i64,
        /// Search term that returns the item
        query: Option<String>,
    },
    /// Delete a saved item
    Delete {
        #[arg(short, long)]
        media: MediaType,
        #[arg(short, long)]
        track_id: i64,
    },
}

/// Run the parsed command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let db = cli.db.as_deref();

    match &cli.command {
        Commands::Search {
            media,
            query,
            artwork,
        } => cmd_search(&rt, db, *media, query.as_deref(), *artwork),
        Commands::Saved { media } => cmd_saved(&rt, db, *media),
        Commands::Save {
            media,
            track_id,
            query,
        } => cmd_save(&rt, db, *media, *track_id, query.as_deref()),
        Commands::Delete { media, track_id } => cmd_delete(&rt, db, *media, *track_id),
    }
}

/// Shared state of one command invocation.
struct Context {
    config: Config,
    client: Arc<ItunesClient>,
    store: Arc<SqliteItemStore>,
}

impl Context {
    async fn open(db: Option<&Path>) -> anyhow::Result<Self> {
        let config = config::load();
        let client = Arc::new(ItunesClient::from_config(&config.catalog)?);

        let path = db
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.storage.resolved_database_path());
        let store = SqliteItemStore::open(&path)
            .await
            .with_context(|| format!("Failed to open store at {}", path.display()))?;

        Ok(Self {
            config,
            client,
            store: Arc::new(store),
        })
    }

    fn session(&self) -> CatalogSession<ItunesClient> {
        CatalogSession::with_artwork_size(Arc::clone(&self.client), self.config.catalog.artwork_size)
    }

    fn loader(&self) -> ArtworkLoader<ItunesClient> {
        ArtworkLoader::new(Arc::clone(&self.client))
    }

    fn reconciler(&self) -> Reconciler<SqliteItemStore> {
        Reconciler::new(Arc::clone(&self.store))
    }

    /// Persist browsing choices. Failure only costs the remembered state.
    fn persist(&self) {
        if let Err(e) = config::save(&self.config) {
            tracing::warn!(error = %e, "Failed to save config");
        }
    }
}

/// One listing line; `*` marks items saved locally.
fn format_row(item: &CatalogItem, saved: bool) -> String {
    format!(
        "[{}] {} — {} ({})",
        if saved { '*' } else { ' ' },
        item.track_name(),
        item.artist_name(),
        item.track_id()
    )
}

/// A non-blank explicit query.
fn explicit_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
