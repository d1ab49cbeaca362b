// src/models.rs
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of days a posting stays listed after its posting date.
pub const EXPIRY_DAYS: u64 = 30;

/// Value used for any text field no selector could resolve.
pub const UNRESOLVED: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
    Indeed,
    LinkedIn,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::Indeed => "Indeed",
            JobSource::LinkedIn => "LinkedIn",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indeed" => Ok(JobSource::Indeed),
            "linkedin" => Ok(JobSource::LinkedIn),
            _ => anyhow::bail!("Unknown job source: {}. Use Indeed or LinkedIn", s),
        }
    }
}

/// A job card that made it through extraction, before any source policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCandidate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub date_text: String,
    pub date_posted: NaiveDate,
    pub link: String,
}

/// A posting ready to be inserted. `expiry_date` is fixed here and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub source: JobSource,
    pub date_posted: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl NewJobPosting {
    pub fn from_candidate(candidate: JobCandidate, source: JobSource) -> Self {
        let expiry_date = expiry_for(candidate.date_posted);
        Self {
            title: candidate.title,
            company: candidate.company,
            location: candidate.location,
            link: candidate.link,
            source,
            date_posted: candidate.date_posted,
            expiry_date,
        }
    }
}

pub fn expiry_for(date_posted: NaiveDate) -> NaiveDate {
    date_posted
        .checked_add_days(Days::new(EXPIRY_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// A stored posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub source: JobSource,
    pub date_posted: NaiveDate,
    pub expiry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.title, self.company, self.source)
    }
}
