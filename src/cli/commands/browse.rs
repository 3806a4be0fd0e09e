//! Remote search and saved-item listing commands.

use std::path::Path;

use futures::future::join_all;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::{Context, explicit_query, format_row};
use crate::model::MediaType;

/// Search the remote catalog and print the results
pub fn cmd_search(
    rt: &Runtime,
    db: Option<&Path>,
    media: Option<MediaType>,
    query: Option<&str>,
    with_artwork: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let mut ctx = Context::open(db).await?;
        let media = media.unwrap_or(ctx.config.browsing.last_online_media);
        let query = explicit_query(query);
        let term = query
            .unwrap_or_else(|| ctx.config.browsing.effective_search(media))
            .to_string();

        let session = ctx.session();
        session.refresh(media, &term).await?;

        ctx.config.browsing.last_online_media = media;
        if let Some(query) = query {
            ctx.config.browsing.remember_search(query);
        }
        ctx.persist();

        let items = session.items();
        println!("{} results for \"{}\": {}", media.title(), session.query(), items.len());

        let artwork = if with_artwork {
            let loader = ctx.loader();
            join_all(items.iter().map(|item| loader.acquire(item))).await
        } else {
            Vec::new()
        };

        let reconciler = ctx.reconciler();
        for (i, item) in items.iter().enumerate() {
            let saved = reconciler.is_saved(item).await?;
            let row = format_row(item, saved);
            match artwork.get(i) {
                Some(Ok(image)) => println!("{row} [{}x{}]", image.width(), image.height()),
                Some(Err(e)) => {
                    debug!(key = %item.key(), error = %e, "No artwork");
                    println!("{row} [no artwork]");
                }
                None => println!("{row}"),
            }
        }

        let failed = artwork.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = items.len(), "Some artwork could not be downloaded");
        }

        anyhow::Ok(())
    })
}

/// List saved items of one media type
pub fn cmd_saved(rt: &Runtime, db: Option<&Path>, media: Option<MediaType>) -> anyhow::Result<()> {
    rt.block_on(async {
        let mut ctx = Context::open(db).await?;
        let media = media.unwrap_or(ctx.config.browsing.last_saved_media);

        let items = ctx.reconciler().list_saved(media).await?;

        ctx.config.browsing.last_saved_media = media;
        ctx.persist();

        if items.is_empty() {
            println!("No saved {} items.", media);
            return Ok(());
        }

        println!("Saved {} items: {}", media, items.len());
        for item in &items {
            let suffix = match item.image() {
                Some(image) => format!(" [{}x{}]", image.width(), image.height()),
                None => String::new(),
            };
            println!("{}{suffix}", format_row(item, true));
        }

        anyhow::Ok(())
    })
}
