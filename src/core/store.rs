// src/core/store.rs
use crate::models::{JobPosting, NewJobPosting};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    /// Another posting already holds this link.
    Duplicate,
}

/// Keyed collection of postings. `link` is the only identity a posting has.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn exists_by_link(&self, link: &str) -> Result<bool>;

    /// Insert-if-absent. A posting whose link is already stored is a no-op
    /// reported as `Duplicate`, never an error.
    async fn insert(&self, posting: &NewJobPosting) -> Result<InsertOutcome>;

    /// All postings, most recently created first.
    async fn list_recent(&self) -> Result<Vec<JobPosting>>;
}
