// src/sources/indeed.rs
use super::{selectors, PostFilter, ScrollPolicy, SourceDefinition, WaitStage};
use crate::extract::FieldSelectors;
use crate::models::JobSource;

pub const SEARCH_URL: &str = "https://www.indeed.com/jobs?q=python+developer&l=remote";

/// Indeed: scroll first, then wait for the cards themselves.
pub fn definition() -> SourceDefinition {
    SourceDefinition {
        source: JobSource::Indeed,
        search_url: SEARCH_URL.to_string(),
        card_selectors: selectors(&[".job_seen_beacon", ".cardOutline", ".jobsearch-SerpJobCard"]),
        ready_selectors: Vec::new(),
        wait_stage: WaitStage::AfterScroll,
        wait_timeout_secs: 15,
        scroll: ScrollPolicy {
            max_scrolls: 5,
            pause_ms: 2_000,
            show_more_selector: None,
            show_more_pause_ms: 0,
        },
        fields: FieldSelectors {
            title: selectors(&[
                "h2.jobTitle span",
                "h2 a span",
                ".jobTitle span",
                "[data-testid='jobTitle']",
                "h2",
            ]),
            company: selectors(&[
                ".companyName",
                ".company",
                "[data-testid='company-name']",
                ".companyOverviewLink",
            ]),
            location: selectors(&[
                ".companyLocation",
                ".location",
                "[data-testid='text-location']",
                ".locationAccessibility",
            ]),
            date: selectors(&[
                ".date",
                ".result-link-bar-container span",
                ".jobsearch-SerpJobCard-footer span",
                ".posted-since",
            ]),
            link: selectors(&["h2 a", "a.jobTitle", "a[data-jk]"]),
        },
        post_filter: PostFilter::None,
        browser_args: selectors(&["--disable-blink-features=AutomationControlled"]),
    }
}
