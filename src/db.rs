//! Postgres-backed file store and user statistics.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use tracing::{error, info};

use crate::store::{FileRecord, FileStore, StoreError};

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS files (
            id BIGSERIAL PRIMARY KEY,
            file_id TEXT NOT NULL,
            name TEXT,
            category TEXT NOT NULL,
            uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create files table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS files_category_idx ON files (category)")
        .execute(pool)
        .await
        .context("Failed to create files category index")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user_stats (
            user_id BIGINT PRIMARY KEY,
            username TEXT,
            first_name TEXT NOT NULL DEFAULT '',
            interactions BIGINT NOT NULL DEFAULT 0,
            uploads BIGINT NOT NULL DEFAULT 0,
            downloads BIGINT NOT NULL DEFAULT 0,
            first_seen TIMESTAMPTZ NOT NULL DEFAULT now(),
            last_seen TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create user_stats table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Escape LIKE metacharacters so a search query matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `FileStore` implementation over a Postgres pool.
#[derive(Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn save(
        &self,
        file_id: &str,
        name: Option<&str>,
        category: &str,
    ) -> Result<(), StoreError> {
        info!(file_id = %file_id, category = %category, "Saving file record");

        sqlx::query("INSERT INTO files (file_id, name, category) VALUES ($1, $2, $3)")
            .bind(file_id)
            .bind(name)
            .bind(category)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<FileRecord>, StoreError> {
        if category.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, FileRecord>(
            "SELECT id, file_id, name, category, uploaded_at FROM files
             WHERE category = $1 ORDER BY id",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn fetch_by_query(&self, query: &str) -> Result<Vec<FileRecord>, StoreError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(query));
        let records = sqlx::query_as::<_, FileRecord>(
            "SELECT id, file_id, name, category, uploaded_at FROM files
             WHERE name ILIKE $1 ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

/// Per-user interaction counters.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserStats {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub interactions: i64,
    pub uploads: i64,
    pub downloads: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Count one handled message for `user_id`, creating the row on first contact.
/// Best-effort: a failure is logged and never interrupts message handling.
pub async fn record_interaction(
    pool: &PgPool,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
) {
    let result = sqlx::query(
        "INSERT INTO user_stats (user_id, username, first_name, interactions)
         VALUES ($1, $2, $3, 1)
         ON CONFLICT (user_id) DO UPDATE SET
             interactions = user_stats.interactions + 1,
             username = EXCLUDED.username,
             first_name = EXCLUDED.first_name,
             last_seen = now()",
    )
    .bind(user_id)
    .bind(username)
    .bind(first_name)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!(user_id, error = %e, "Failed to record user interaction");
    }
}

/// Count one stored upload for `user_id`. Best-effort, like `record_interaction`.
pub async fn record_upload(pool: &PgPool, user_id: i64) {
    let result =
        sqlx::query("UPDATE user_stats SET uploads = uploads + 1, last_seen = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await;

    if let Err(e) = result {
        error!(user_id, error = %e, "Failed to record upload");
    }
}

/// Count `count` delivered documents for `user_id`. Best-effort.
pub async fn record_downloads(pool: &PgPool, user_id: i64, count: i64) {
    if count == 0 {
        return;
    }

    let result = sqlx::query(
        "UPDATE user_stats SET downloads = downloads + $2, last_seen = now() WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(count)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!(user_id, error = %e, "Failed to record downloads");
    }
}

/// Read the stored counters for `user_id`.
pub async fn get_user_stats(pool: &PgPool, user_id: i64) -> Result<Option<UserStats>> {
    let stats = sqlx::query_as::<_, UserStats>(
        "SELECT user_id, username, first_name, interactions, uploads, downloads,
                first_seen, last_seen
         FROM user_stats WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read user stats")?;

    Ok(stats)
}
