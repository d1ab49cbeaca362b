// src/extract/card.rs
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dates::normalize_date_at;
use super::resolver::{resolve_attribute, resolve_text};
use crate::browser::DomNode;
use crate::models::{JobCandidate, UNRESOLVED};

/// Ordered selector lists for every field of a job card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelectors {
    pub title: Vec<String>,
    pub company: Vec<String>,
    pub location: Vec<String>,
    pub date: Vec<String>,
    pub link: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No link could be found, so the card cannot be deduplicated or stored.
    MissingLink,
    /// Neither title nor company resolved.
    MissingIdentity,
    /// Paid placement; carries the marker that matched.
    Promotional(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingLink => f.write_str("no link"),
            SkipReason::MissingIdentity => f.write_str("no title or company"),
            SkipReason::Promotional(term) => write!(f, "promotional ({})", term),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Extracted(JobCandidate),
    Skipped(SkipReason),
}

/// Extract one card. `Err` means the card itself is broken (e.g. the link
/// element went stale); selector misses are never errors.
pub async fn extract_card<N: DomNode>(
    card: &N,
    fields: &FieldSelectors,
    today: NaiveDate,
) -> Result<CardOutcome> {
    let title = resolve_text(card, &fields.title, UNRESOLVED).await;
    let company = resolve_text(card, &fields.company, UNRESOLVED).await;
    let location = resolve_text(card, &fields.location, UNRESOLVED).await;
    let date_text = resolve_text(card, &fields.date, UNRESOLVED).await;
    let date_posted = normalize_date_at(&date_text, today);

    let Some(link) = resolve_attribute(card, &fields.link, "href").await? else {
        return Ok(CardOutcome::Skipped(SkipReason::MissingLink));
    };

    Ok(CardOutcome::Extracted(JobCandidate {
        title,
        company,
        location,
        date_text,
        date_posted,
        link,
    }))
}
