// src/core/database.rs
//! SQLite-backed job store

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

use crate::core::{FsOps, InsertOutcome, JobStore};
use crate::models::{JobPosting, NewJobPosting};

// ===== Connection Management =====

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, used by tests and replays
    pub async fn in_memory() -> Result<Self> {
        // A single long-lived connection: every new connection would see an empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.pool.clone())
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                link TEXT NOT NULL UNIQUE,
                source TEXT NOT NULL DEFAULT 'Indeed',
                date_posted TEXT NOT NULL,
                expiry_date TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_source ON jobs(source);")
            .execute(&self.pool)
            .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Job Repository =====

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    title: String,
    company: String,
    location: String,
    link: String,
    source: String,
    date_posted: NaiveDate,
    expiry_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for JobPosting {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        Ok(JobPosting {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            source: row
                .source
                .parse()
                .with_context(|| format!("Invalid source stored for {}", row.link))?,
            link: row.link,
            date_posted: row.date_posted,
            expiry_date: row.expiry_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

impl JobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn exists_by_link(&self, link: &str) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM jobs WHERE link = ? LIMIT 1")
            .bind(link)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, posting: &NewJobPosting) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (title, company, location, link, source, date_posted, expiry_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(link) DO NOTHING
            "#,
        )
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.link)
        .bind(posting.source.as_str())
        .bind(posting.date_posted)
        .bind(posting.expiry_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                debug!("Link already stored: {}", posting.link);
                Ok(InsertOutcome::Duplicate)
            }
            Ok(done) => Ok(InsertOutcome::Inserted(done.last_insert_rowid())),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!("Unique constraint hit for {}", posting.link);
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to insert job {}", posting.link)),
        }
    }

    async fn list_recent(&self) -> Result<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, company, location, link, source, date_posted, expiry_date, created_at
            FROM jobs
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JobPosting::try_from).collect()
    }
}
