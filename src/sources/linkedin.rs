// src/sources/linkedin.rs
use super::{selectors, PostFilter, ScrollPolicy, SourceDefinition, WaitStage};
use crate::extract::FieldSelectors;
use crate::models::JobSource;

pub const SEARCH_URL: &str =
    "https://www.linkedin.com/jobs/search/?keywords=Python%20Developer&location=Remote";

/// LinkedIn: wait for the result list, then scroll and press "show more".
/// Cards are mixed with paid placements, hence the promotional filter.
pub fn definition() -> SourceDefinition {
    SourceDefinition {
        source: JobSource::LinkedIn,
        search_url: SEARCH_URL.to_string(),
        card_selectors: selectors(&[
            ".jobs-search-results__list-item",
            "li.jobs-search-results__list-item",
            ".job-card-container",
            ".job-card-list",
            "[data-entity-urn^='urn:li:jobPosting:']",
        ]),
        ready_selectors: selectors(&[
            ".jobs-search__results-list",
            ".scaffold-layout__list-container",
        ]),
        wait_stage: WaitStage::BeforeScroll,
        wait_timeout_secs: 20,
        scroll: ScrollPolicy {
            max_scrolls: 5,
            pause_ms: 3_000,
            show_more_selector: Some("button.infinite-scroller__show-more-button".to_string()),
            show_more_pause_ms: 2_000,
        },
        fields: FieldSelectors {
            title: selectors(&[
                "h3.base-search-card__title",
                ".job-card-list__title",
                "h3.job-card-title",
                ".artdeco-entity-lockup__title",
                "h3",
            ]),
            company: selectors(&[
                "h4.base-search-card__subtitle",
                ".job-card-container__company-name",
                ".artdeco-entity-lockup__subtitle",
                "h4.job-card-company-name",
                "h4",
            ]),
            location: selectors(&[
                ".job-card-container__metadata-item",
                ".job-search-card__location",
                ".job-card-location",
                ".artdeco-entity-lockup__caption",
                ".job-card-container__metadata-wrapper",
            ]),
            date: selectors(&[
                "time",
                ".job-search-card__listdate",
                ".job-card-container__metadata-item--last-modified",
                ".posted-time-ago__text",
                ".job-card-container__metadata-item:nth-child(2)",
            ]),
            link: selectors(&[
                "a.base-card__full-link",
                "a.job-card-container__link",
                "a.job-card-list__title",
                "a[href*='/jobs/view/']",
            ]),
        },
        post_filter: PostFilter::Promotional,
        browser_args: Vec::new(),
    }
}
