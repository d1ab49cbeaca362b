// src/aggregator.rs
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::browser::{BrowserLauncher, LaunchConfig};
use crate::core::JobStore;
use crate::models::JobPosting;
use crate::scrape::{ScrapeReport, SourceScraper};
use crate::sources::SourceDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub reports: Vec<ScrapeReport>,
}

impl AggregateReport {
    pub fn total_saved(&self) -> usize {
        self.reports.iter().map(|report| report.saved).sum()
    }
}

/// Runs every configured source, one after another, against one store.
pub struct Aggregator<L, S> {
    launcher: L,
    store: S,
    launch: LaunchConfig,
    sources: Vec<SourceDefinition>,
    today: Option<NaiveDate>,
}

impl<L, S> Aggregator<L, S>
where
    L: BrowserLauncher,
    S: JobStore,
{
    pub fn new(launcher: L, store: S, launch: LaunchConfig, sources: Vec<SourceDefinition>) -> Self {
        Self {
            launcher,
            store,
            launch,
            sources,
            today: None,
        }
    }

    /// Resolve posting ages against a fixed date instead of the local clock
    pub fn on_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scrape all sources in order. A failing source never stops the next one.
    pub async fn run(&self) -> AggregateReport {
        let mut reports = Vec::with_capacity(self.sources.len());

        for definition in &self.sources {
            info!("Starting {} scrape...", definition.source);
            let report = SourceScraper::new(&self.launcher, &self.store, &self.launch, definition)
                .on_date(self.today)
                .run()
                .await;
            reports.push(report);
        }

        let report = AggregateReport { reports };
        info!("Scraping completed! {} new postings", report.total_saved());
        report
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// Present when a scrape ran before listing.
    pub report: Option<AggregateReport>,
    pub jobs: Vec<JobPosting>,
}

/// Entry point for the request layers: "scrape then list" or "list only".
pub struct JobBoard<L, S> {
    aggregator: Aggregator<L, S>,
}

impl<L, S> JobBoard<L, S>
where
    L: BrowserLauncher,
    S: JobStore,
{
    pub fn new(aggregator: Aggregator<L, S>) -> Self {
        Self { aggregator }
    }

    /// Scrape failures are reported, never raised; only reading the store can fail.
    pub async fn listing(&self, scrape: bool) -> Result<Listing> {
        let report = if scrape {
            Some(self.aggregator.run().await)
        } else {
            None
        };

        let jobs = self.aggregator.store().list_recent().await?;
        Ok(Listing { report, jobs })
    }
}
