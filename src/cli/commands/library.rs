//! Commands that change the saved items.

use std::path::Path;

use anyhow::bail;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::{Context, explicit_query, format_row};
use crate::model::MediaType;
use crate::reconcile::SaveOutcome;

/// Find a search result by track id and save it with its artwork
pub fn cmd_save(
    rt: &Runtime,
    db: Option<&Path>,
    media: MediaType,
    track_id: i64,
    query: Option<&str>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let ctx = Context::open(db).await?;
        let term = explicit_query(query)
            .unwrap_or_else(|| ctx.config.browsing.effective_search(media))
            .to_string();

        let session = ctx.session();
        session.refresh(media, &term).await?;

        let Some(item) = session
            .items()
            .iter()
            .find(|item| item.track_id() == track_id)
            .cloned()
        else {
            bail!("Track {track_id} not found in {media} results for \"{term}\"");
        };

        // The item is saved either way; without artwork it just has no image
        match ctx.loader().acquire(&item).await {
            Ok(image) => info!(key = %item.key(), width = image.width(), height = image.height(), "Artwork ready"),
            Err(e) => warn!(key = %item.key(), error = %e, "Saving without artwork"),
        }

        let outcome = ctx.reconciler().save_or_update(&item).await?;
        let verb = match outcome {
            SaveOutcome::Created => "Saved",
            SaveOutcome::Updated => "Updated",
        };
        println!("{verb}: {}", format_row(&item, true));

        anyhow::Ok(())
    })
}

/// Delete a saved item
pub fn cmd_delete(rt: &Runtime, db: Option<&Path>, media: MediaType, track_id: i64) -> anyhow::Result<()> {
    rt.block_on(async {
        let ctx = Context::open(db).await?;
        let reconciler = ctx.reconciler();

        let Some(item) = reconciler.find_local(media, track_id).await? else {
            println!("Not saved: {media}/{track_id}");
            return Ok(());
        };

        reconciler.delete(&item).await?;
        println!("Deleted: {}", format_row(&item, false));

        anyhow::Ok(())
    })
}
