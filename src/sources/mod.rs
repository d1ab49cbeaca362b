// src/sources/mod.rs
//! Per-source scrape configuration.
//!
//! Each source is plain data: where to go, how to load the full result list,
//! which selectors find cards and fields, and which quality filter applies.
//! Adding or retuning a source never touches the extraction code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::extract::{FieldSelectors, SkipReason};
use crate::models::{JobCandidate, JobSource, UNRESOLVED};

pub mod indeed;
pub mod linkedin;

/// Markers of paid placements, matched case-insensitively in title and company.
pub const PROMOTIONAL_TERMS: [&str; 3] = ["promoted", "sponsored", "advertisement"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub source: JobSource,
    pub search_url: String,
    pub card_selectors: Vec<String>,
    /// Containers that signal the result list rendered. Empty means the card selectors.
    #[serde(default)]
    pub ready_selectors: Vec<String>,
    pub wait_stage: WaitStage,
    pub wait_timeout_secs: u64,
    pub scroll: ScrollPolicy,
    pub fields: FieldSelectors,
    #[serde(default)]
    pub post_filter: PostFilter,
    #[serde(default)]
    pub browser_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitStage {
    BeforeScroll,
    AfterScroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollPolicy {
    pub max_scrolls: u32,
    pub pause_ms: u64,
    #[serde(default)]
    pub show_more_selector: Option<String>,
    #[serde(default)]
    pub show_more_pause_ms: u64,
}

impl ScrollPolicy {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn show_more_pause(&self) -> Duration {
        Duration::from_millis(self.show_more_pause_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostFilter {
    #[default]
    None,
    /// Drop cards with no identity and paid placements.
    Promotional,
}

impl PostFilter {
    pub fn check(&self, candidate: &JobCandidate) -> Option<SkipReason> {
        match self {
            PostFilter::None => None,
            PostFilter::Promotional => promotional_reason(candidate),
        }
    }
}

fn promotional_reason(candidate: &JobCandidate) -> Option<SkipReason> {
    if candidate.title == UNRESOLVED && candidate.company == UNRESOLVED {
        return Some(SkipReason::MissingIdentity);
    }

    let title = candidate.title.to_lowercase();
    let company = candidate.company.to_lowercase();
    PROMOTIONAL_TERMS
        .iter()
        .find(|term| title.contains(*term) || company.contains(*term))
        .map(|term| SkipReason::Promotional(term.to_string()))
}

impl SourceDefinition {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn wait_selectors(&self) -> &[String] {
        if self.ready_selectors.is_empty() {
            &self.card_selectors
        } else {
            &self.ready_selectors
        }
    }

    /// Same source with every scroll pause removed, for replaying saved pages
    pub fn without_pauses(mut self) -> Self {
        self.scroll.pause_ms = 0;
        self.scroll.show_more_pause_ms = 0;
        self
    }
}

/// The built-in sources, in the order they are scraped.
pub fn default_sources() -> Vec<SourceDefinition> {
    vec![indeed::definition(), linkedin::definition()]
}

pub(crate) fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
