//! Job board aggregator: renders job-search result pages in a browser,
//! extracts postings from their cards and keeps a deduplicated store.

pub mod aggregator;
pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod extract;
pub mod models;
pub mod scrape;
pub mod sources;
pub mod web;

pub use aggregator::{AggregateReport, Aggregator, JobBoard, Listing};
pub use models::{JobPosting, JobSource, NewJobPosting};
pub use scrape::{ScrapeError, ScrapeReport, SourceScraper};
