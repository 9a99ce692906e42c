//! Destination stores.
//!
//! Each destination is an independent SQLite file holding one keyed table of
//! sparse JSON documents, addressed by (`pk`, `sk`). Writes are batched
//! upserts inside a transaction; reads support the pre-write merge that
//! makes accumulation hold across runs, not just within one. Multiple
//! destinations receive identical payloads (fan-out, not sharding).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::models::PlaceRecord;

/// A single opened destination store.
pub struct Destination {
    pub name: String,
    pub path: PathBuf,
    pool: SqlitePool,
}

impl Destination {
    pub async fn open(name: &str, path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open destination '{}' at {}", name, path.display()))?;

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            pool,
        })
    }

    /// Create the places table. Idempotent.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS places (
                pk TEXT NOT NULL,
                sk TEXT NOT NULL,
                doc TEXT NOT NULL,
                PRIMARY KEY (pk, sk)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetch one record by key, if present.
    pub async fn fetch(&self, pk: &str, sk: &str) -> Result<Option<PlaceRecord>> {
        let doc: Option<String> = sqlx::query_scalar("SELECT doc FROM places WHERE pk = ? AND sk = ?")
            .bind(pk)
            .bind(sk)
            .fetch_optional(&self.pool)
            .await?;
        doc.map(|d| {
            serde_json::from_str(&d)
                .with_context(|| format!("Corrupt record in '{}' for {}", self.name, pk))
        })
        .transpose()
    }

    /// Upsert a batch of records in one transaction.
    pub async fn put_batch(&self, records: &[PlaceRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            let doc = serde_json::to_string(record)?;
            sqlx::query(
                "INSERT INTO places (pk, sk, doc) VALUES (?, ?, ?)
                 ON CONFLICT(pk, sk) DO UPDATE SET doc = excluded.doc",
            )
            .bind(&record.pk)
            .bind(&record.sk)
            .bind(doc)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Total number of stored records.
    pub async fn count(&self) -> Result<i64> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM places")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Number of records flagged for human review.
    pub async fn review_count(&self) -> Result<i64> {
        let n = sqlx::query_scalar(
            "SELECT COUNT(*) FROM places WHERE json_extract(doc, '$.needs_review')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }

    /// Highest relevance score on record, if any records exist.
    pub async fn max_score(&self) -> Result<Option<i64>> {
        let n = sqlx::query_scalar("SELECT MAX(json_extract(doc, '$.habesha_score')) FROM places")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open the configured destinations, optionally restricted to a subset of
/// names given on the command line.
pub async fn open_destinations(config: &Config, only: &[String]) -> Result<Vec<Destination>> {
    let mut destinations = Vec::new();
    for (name, dest_config) in &config.destinations {
        if !only.is_empty() && !only.contains(name) {
            continue;
        }
        destinations.push(Destination::open(name, &dest_config.path).await?);
    }
    if destinations.is_empty() {
        anyhow::bail!(
            "No destinations selected. Configured: {}",
            config
                .destinations
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(destinations)
}

/// `habi init`: create the schema in every configured destination.
pub async fn run_init(config: &Config) -> Result<()> {
    for (name, dest_config) in &config.destinations {
        let dest = Destination::open(name, &dest_config.path).await?;
        dest.init_schema().await?;
        dest.close().await;
        println!("Destination '{}' initialized at {}", name, dest_config.path.display());
    }
    Ok(())
}
