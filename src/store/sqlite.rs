//! SQLite implementation of [`ItemStore`].

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};

use super::{ItemStore, SavedItemRecord};
use crate::error::{Error, Result, ResultExt};
use crate::model::{ItemKey, MediaType};

/// Build a SQLite database URL from a file path.
pub fn db_url(path: &Path) -> String {
    format!("sqlite:{}", path.display())
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url)
            .await
            .with_context(format!("creating {db_url}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .with_context(format!("connecting to {db_url}"))?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Database row for the saved_items table.
#[derive(Debug, sqlx::FromRow)]
struct SavedItemRow {
    media_type: String,
    track_id: i64,
    track_name: String,
    artist_name: String,
    image: Option<Vec<u8>>,
    saved_at: String,
}

impl TryFrom<SavedItemRow> for SavedItemRecord {
    type Error = Error;

    fn try_from(row: SavedItemRow) -> Result<Self> {
        let media_type: MediaType = row.media_type.parse().map_err(Error::invalid_record)?;
        let saved_at: DateTime<Utc> = row.saved_at.parse().map_err(|e| {
            Error::invalid_record(format!("bad saved_at {:?}: {e}", row.saved_at))
        })?;

        Ok(SavedItemRecord {
            key: ItemKey::new(media_type, row.track_id),
            track_name: row.track_name,
            artist_name: row.artist_name,
            image: row.image,
            saved_at,
        })
    }
}

/// Insert `record`, or overwrite the existing row. Returns true on overwrite.
async fn write_record(conn: &mut SqliteConnection, record: &SavedItemRecord) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO saved_items (media_type, track_id, track_name, artist_name, image, saved_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.key.media_type.as_str())
    .bind(record.key.track_id)
    .bind(&record.track_name)
    .bind(&record.artist_name)
    .bind(&record.image)
    .bind(record.saved_at.to_rfc3339())
    .execute(&mut *conn)
    .await
    .with_context(format!("saving {}", record.key))?;

    if result.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE saved_items
        SET track_name = ?, artist_name = ?, image = ?, saved_at = ?
        WHERE media_type = ? AND track_id = ?
        "#,
    )
    .bind(&record.track_name)
    .bind(&record.artist_name)
    .bind(&record.image)
    .bind(record.saved_at.to_rfc3339())
    .bind(record.key.media_type.as_str())
    .bind(record.key.track_id)
    .execute(&mut *conn)
    .await
    .with_context(format!("updating {}", record.key))?;

    Ok(true)
}

/// Saved items persisted in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let pool = init_db(&db_url(path)).await?;
        tracing::debug!(path = %path.display(), "Opened saved item store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn find(&self, key: ItemKey) -> Result<Option<SavedItemRecord>> {
        let row: Option<SavedItemRow> = sqlx::query_as(
            r#"
            SELECT media_type, track_id, track_name, artist_name, image, saved_at
            FROM saved_items
            WHERE media_type = ? AND track_id = ?
            "#,
        )
        .bind(key.media_type.as_str())
        .bind(key.track_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SavedItemRecord::try_from).transpose()
    }

    async fn upsert(&self, record: &SavedItemRecord) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;

        // IMMEDIATE takes the write lock up front (waiting on busy_timeout),
        // so the insert-or-update pair runs as one unit per key.
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        match write_record(&mut *conn, record).await {
            Ok(replaced) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(replaced)
            }
            Err(e) => {
                if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn delete(&self, key: ItemKey) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_items WHERE media_type = ? AND track_id = ?")
            .bind(key.media_type.as_str())
            .bind(key.track_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_sorted(&self, media_type: MediaType) -> Result<Vec<SavedItemRecord>> {
        let rows: Vec<SavedItemRow> = sqlx::query_as(
            r#"
            SELECT media_type, track_id, track_name, artist_name, image, saved_at
            FROM saved_items
            WHERE media_type = ?
            ORDER BY track_name COLLATE NOCASE ASC, track_id ASC
            "#,
        )
        .bind(media_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SavedItemRecord::try_from).collect()
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM saved_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
