// src/scrape.rs
//! One scrape run against one source.
//!
//! Launch -> Navigate -> (Wait) -> Scroll -> (Wait) -> per-card extraction ->
//! Shutdown. A run never returns an error: failures end the run early and are
//! recorded in the returned [`ScrapeReport`]. The browser session is released
//! on every path once it was acquired.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::{BrowserLauncher, BrowserSession, DomNode, LaunchConfig};
use crate::core::{InsertOutcome, JobStore};
use crate::extract::{extract_card, local_today, CardOutcome, SkipReason};
use crate::models::{JobCandidate, JobSource, NewJobPosting};
use crate::sources::{SourceDefinition, WaitStage};

const PAGE_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight";
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Why a source's run ended before its cards were processed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser could not be launched: {0:#}")]
    Launch(anyhow::Error),
    #[error("{site} job cards did not load within {timeout:?}")]
    CardsTimeout { site: JobSource, timeout: Duration },
    #[error("browser session failed: {0:#}")]
    Session(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    pub source: JobSource,
    pub cards_found: usize,
    pub saved: usize,
    pub duplicates: usize,
    /// Skipped cards counted by reason.
    pub skipped: BTreeMap<String, usize>,
    /// Cards that raised during extraction or storage.
    pub failed: usize,
    pub error: Option<String>,
}

impl ScrapeReport {
    pub fn new(source: JobSource) -> Self {
        Self {
            source,
            cards_found: 0,
            saved: 0,
            duplicates: 0,
            skipped: BTreeMap::new(),
            failed: 0,
            error: None,
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn completed(&self) -> bool {
        self.error.is_none()
    }

    fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.to_string()).or_insert(0) += 1;
    }
}

pub struct SourceScraper<'a, L, S> {
    launcher: &'a L,
    store: &'a S,
    launch: &'a LaunchConfig,
    definition: &'a SourceDefinition,
    today: Option<NaiveDate>,
}

impl<'a, L, S> SourceScraper<'a, L, S>
where
    L: BrowserLauncher,
    S: JobStore,
{
    pub fn new(
        launcher: &'a L,
        store: &'a S,
        launch: &'a LaunchConfig,
        definition: &'a SourceDefinition,
    ) -> Self {
        Self {
            launcher,
            store,
            launch,
            definition,
            today: None,
        }
    }

    /// Pin the date relative posting ages are resolved against
    pub fn on_date(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    pub async fn run(&self) -> ScrapeReport {
        let source = self.definition.source;
        let mut report = ScrapeReport::new(source);

        let launch = self.launch.with_extra_args(&self.definition.browser_args);
        let session = match self.launcher.launch(&launch).await {
            Ok(session) => session,
            Err(e) => {
                let err = ScrapeError::Launch(e);
                error!("{} scrape aborted: {}", source, err);
                report.error = Some(err.to_string());
                return report;
            }
        };

        if let Err(err) = self.drive(&session, &mut report).await {
            error!("{} scrape aborted: {}", source, err);
            report.error = Some(err.to_string());
        }

        if let Err(e) = session.quit().await {
            warn!("Failed to release {} browser session: {:#}", source, e);
        }

        info!(
            "{} scrape finished: {} cards, {} saved, {} duplicates, {} skipped, {} failed",
            source,
            report.cards_found,
            report.saved,
            report.duplicates,
            report.skipped_total(),
            report.failed
        );
        report
    }

    async fn drive(&self, session: &L::Session, report: &mut ScrapeReport) -> Result<(), ScrapeError> {
        let definition = self.definition;

        session
            .navigate(&definition.search_url)
            .await
            .map_err(ScrapeError::Session)?;

        if definition.wait_stage == WaitStage::BeforeScroll {
            self.wait_for_results(session).await?;
        }

        self.scroll_to_exhaustion(session)
            .await
            .map_err(ScrapeError::Session)?;

        if definition.wait_stage == WaitStage::AfterScroll {
            self.wait_for_results(session).await?;
        }

        let cards = session
            .find_elements(&definition.card_selectors.join(", "))
            .await
            .map_err(ScrapeError::Session)?;
        report.cards_found = cards.len();
        info!("Found {} {} job cards", cards.len(), definition.source);

        let today = self.today.unwrap_or_else(local_today);
        for card in &cards {
            self.process_card(card, today, report).await;
        }

        Ok(())
    }

    async fn wait_for_results(&self, session: &L::Session) -> Result<(), ScrapeError> {
        let timeout = self.definition.wait_timeout();
        match session
            .wait_for_any(self.definition.wait_selectors(), timeout)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(ScrapeError::CardsTimeout {
                site: self.definition.source,
                timeout,
            }),
            Err(e) => Err(ScrapeError::Session(e)),
        }
    }

    /// Scroll until the page stops growing or the attempt budget runs out
    async fn scroll_to_exhaustion(&self, session: &L::Session) -> Result<()> {
        let policy = &self.definition.scroll;
        let mut last_height = page_height(session).await?;

        for attempt in 1..=policy.max_scrolls {
            session.execute_script(SCROLL_SCRIPT).await?;
            sleep(policy.pause()).await;

            if let Some(selector) = &policy.show_more_selector {
                self.press_show_more(session, selector).await;
            }

            let new_height = page_height(session).await?;
            if new_height == last_height {
                debug!("Page height settled after {} scroll(s)", attempt);
                break;
            }
            last_height = new_height;
        }

        Ok(())
    }

    /// The button is often absent or covered; neither is a failure.
    async fn press_show_more(&self, session: &L::Session, selector: &str) {
        let buttons = match session.find_elements(selector).await {
            Ok(buttons) => buttons,
            Err(e) => {
                debug!("Show-more lookup failed: {:#}", e);
                return;
            }
        };

        if let Some(button) = buttons.first() {
            match button.click().await {
                Ok(()) => sleep(self.definition.scroll.show_more_pause()).await,
                Err(e) => debug!("Show-more click failed: {:#}", e),
            }
        }
    }

    async fn process_card<N: DomNode>(&self, card: &N, today: NaiveDate, report: &mut ScrapeReport) {
        let source = self.definition.source;

        let candidate = match extract_card(card, &self.definition.fields, today).await {
            Ok(CardOutcome::Extracted(candidate)) => candidate,
            Ok(CardOutcome::Skipped(reason)) => {
                debug!("Skipping {} card: {}", source, reason);
                report.record_skip(&reason);
                return;
            }
            Err(e) => {
                warn!("Error scraping {} card: {:#}", source, e);
                report.failed += 1;
                return;
            }
        };

        debug!(
            "{} - Title: '{}', Company: '{}', Location: '{}', Date: '{}'",
            source, candidate.title, candidate.company, candidate.location, candidate.date_text
        );

        if let Some(reason) = self.definition.post_filter.check(&candidate) {
            debug!("Skipping {} card '{}': {}", source, candidate.title, reason);
            report.record_skip(&reason);
            return;
        }

        if let Err(e) = self.persist(candidate, report).await {
            warn!("Failed to store {} job: {:#}", source, e);
            report.failed += 1;
        }
    }

    async fn persist(&self, candidate: JobCandidate, report: &mut ScrapeReport) -> Result<()> {
        if self.store.exists_by_link(&candidate.link).await? {
            report.duplicates += 1;
            return Ok(());
        }

        let posting = NewJobPosting::from_candidate(candidate, self.definition.source);
        match self.store.insert(&posting).await? {
            InsertOutcome::Inserted(_) => {
                info!(
                    "Saved {} job: {} at {}",
                    posting.source, posting.title, posting.company
                );
                report.saved += 1;
            }
            InsertOutcome::Duplicate => report.duplicates += 1,
        }
        Ok(())
    }
}

async fn page_height<B: BrowserSession>(session: &B) -> Result<i64> {
    let value = session.execute_script(PAGE_HEIGHT_SCRIPT).await?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|height| height as i64))
        .with_context(|| format!("Page height is not a number: {}", value))
}
