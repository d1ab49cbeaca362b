// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use jobscout::browser::{BrowserLauncher, BrowserSession, DomNode, LaunchConfig};
use jobscout::extract::FieldSelectors;
use jobscout::models::JobSource;
use jobscout::sources::{PostFilter, ScrollPolicy, SourceDefinition, WaitStage};

pub const INDEED_PAGE: &str = include_str!("../fixtures/indeed_results.html");
pub const LINKEDIN_PAGE: &str = include_str!("../fixtures/linkedin_results.html");

pub const CARD: &str = "li.card";
pub const SHOW_MORE: &str = "button.infinite-scroller__show-more-button";
pub const FAKE_URL: &str = "https://jobs.example.com/search";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A fake source that presses the show-more button after every scroll.
pub fn show_more_source() -> SourceDefinition {
    let mut definition = fake_source(JobSource::LinkedIn);
    definition.scroll.show_more_selector = Some(SHOW_MORE.to_string());
    definition
}

/// A minimal source that reads `li.card` elements built with [`FakeNode`].
pub fn fake_source(source: JobSource) -> SourceDefinition {
    SourceDefinition {
        source,
        search_url: FAKE_URL.to_string(),
        card_selectors: list(&[CARD]),
        ready_selectors: Vec::new(),
        wait_stage: WaitStage::AfterScroll,
        wait_timeout_secs: 0,
        scroll: ScrollPolicy {
            max_scrolls: 5,
            pause_ms: 0,
            show_more_selector: None,
            show_more_pause_ms: 0,
        },
        fields: FieldSelectors {
            title: list(&[".title"]),
            company: list(&[".company"]),
            location: list(&[".location"]),
            date: list(&[".date"]),
            link: list(&["a"]),
        },
        post_filter: PostFilter::None,
        browser_args: Vec::new(),
    }
}

/// In-memory element tree. Children are keyed by the exact selector used to find them.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: String,
    attributes: HashMap<String, String>,
    children: HashMap<String, Vec<FakeNode>>,
    broken: bool,
    clicks: Arc<AtomicUsize>,
    click_fails: bool,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children.entry(selector.to_string()).or_default().push(node);
        self
    }

    /// Every attribute read fails, like an element that went stale mid-read.
    pub fn stale(mut self) -> Self {
        self.broken = true;
        self
    }

    /// A button whose clicks are counted in `clicks`.
    pub fn button(clicks: &Arc<AtomicUsize>) -> Self {
        Self {
            clicks: Arc::clone(clicks),
            ..Self::text("See more jobs")
        }
    }

    /// Clicks are still counted, then fail as if the element were covered.
    pub fn unclickable(mut self) -> Self {
        self.click_fails = true;
        self
    }

    /// A job card with every field present.
    pub fn card(title: &str, company: &str, date: &str, link: &str) -> Self {
        Self::new()
            .child(".title", Self::text(title))
            .child(".company", Self::text(company))
            .child(".location", Self::text("Remote"))
            .child(".date", Self::text(date))
            .child("a", Self::new().attr("href", link))
    }

    /// A card whose link element fails when read.
    pub fn stale_card(title: &str) -> Self {
        Self::new()
            .child(".title", Self::text(title))
            .child("a", Self::new().attr("href", "https://jobs.example.com/stale").stale())
    }
}

#[async_trait]
impl DomNode for FakeNode {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Self>> {
        Ok(self.children.get(selector).cloned().unwrap_or_default())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        if self.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(self.attributes.get(name).cloned())
    }

    async fn click(&self) -> Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        if self.click_fails {
            return Err(anyhow!("element click intercepted"));
        }
        Ok(())
    }
}

/// What a fake session serves once navigated.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub elements: HashMap<String, Vec<FakeNode>>,
    /// Successive page heights; the last one repeats.
    pub heights: Vec<i64>,
    pub fail_navigation: bool,
}

impl FakePage {
    pub fn with_cards(cards: Vec<FakeNode>) -> Self {
        let mut elements = HashMap::new();
        elements.insert(CARD.to_string(), cards);
        Self {
            elements,
            heights: vec![1_000],
            fail_navigation: false,
        }
    }

    /// Also serve `node` for `selector`.
    pub fn with_element(mut self, selector: &str, node: FakeNode) -> Self {
        self.elements.entry(selector.to_string()).or_default().push(node);
        self
    }
}

/// Counters shared between a launcher and every session it hands out.
#[derive(Debug, Default)]
pub struct Calls {
    pub launches: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub quits: AtomicUsize,
}

impl Calls {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct FakeLauncher {
    page: FakePage,
    fail_launch: bool,
    pub calls: Arc<Calls>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            fail_launch: false,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(FakePage::default())
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self, _config: &LaunchConfig) -> Result<FakeSession> {
        if self.fail_launch {
            return Err(anyhow!("chromedriver not reachable"));
        }
        self.calls.launches.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            page: self.page.clone(),
            heights: Mutex::new(self.page.heights.iter().copied().collect()),
            calls: Arc::clone(&self.calls),
        })
    }
}

pub struct FakeSession {
    page: FakePage,
    heights: Mutex<VecDeque<i64>>,
    calls: Arc<Calls>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Node = FakeNode;

    async fn navigate(&self, url: &str) -> Result<()> {
        if self.page.fail_navigation {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED at {}", url));
        }
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        if !script.starts_with("return") {
            self.calls.scrolls.fetch_add(1, Ordering::SeqCst);
            return Ok(serde_json::Value::Null);
        }

        let mut heights = self.heights.lock().unwrap();
        let height = if heights.len() > 1 {
            heights.pop_front()
        } else {
            heights.front().copied()
        };
        Ok(serde_json::json!(height.unwrap_or(0)))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<FakeNode>> {
        Ok(self.page.elements.get(selector).cloned().unwrap_or_default())
    }

    async fn quit(self) -> Result<()> {
        self.calls.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
