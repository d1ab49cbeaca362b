// src/browser/snapshot.rs
//! Offline browser backed by saved HTML pages.
//!
//! Nothing is rendered or executed: each page is parsed once with the
//! `scraper` crate when navigated to, and nodes are handles into that parsed
//! tree. Page height is constant so scrolling stops after the first attempt.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

use super::{BrowserLauncher, BrowserSession, DomNode, LaunchConfig};

type SharedDocument = Arc<Mutex<Html>>;

#[derive(Debug, Default, Clone)]
pub struct SnapshotLauncher {
    pages: Arc<HashMap<String, String>>,
}

impl SnapshotLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` whenever `url` is navigated to
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.into(), html.into());
        self
    }
}

#[async_trait]
impl BrowserLauncher for SnapshotLauncher {
    type Session = SnapshotSession;

    async fn launch(&self, _config: &LaunchConfig) -> Result<SnapshotSession> {
        Ok(SnapshotSession {
            pages: Arc::clone(&self.pages),
            current: Mutex::new(None),
        })
    }
}

#[derive(Clone)]
struct LoadedPage {
    url: Arc<str>,
    document: SharedDocument,
    height: usize,
}

pub struct SnapshotSession {
    pages: Arc<HashMap<String, String>>,
    current: Mutex<Option<LoadedPage>>,
}

impl SnapshotSession {
    fn loaded(&self) -> Result<LoadedPage> {
        self.current
            .lock()
            .map_err(|_| anyhow!("Snapshot session lock poisoned"))?
            .clone()
            .ok_or_else(|| anyhow!("No page loaded"))
    }
}

#[async_trait]
impl BrowserSession for SnapshotSession {
    type Node = SnapshotNode;

    async fn navigate(&self, url: &str) -> Result<()> {
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| anyhow!("No snapshot saved for {}", url))?;
        let page = LoadedPage {
            url: Arc::from(url),
            document: Arc::new(Mutex::new(Html::parse_document(html))),
            height: html.len(),
        };
        *self
            .current
            .lock()
            .map_err(|_| anyhow!("Snapshot session lock poisoned"))? = Some(page);
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        let page = self.loaded()?;
        if script.contains("scrollHeight") && script.trim_start().starts_with("return") {
            return Ok(serde_json::json!(page.height));
        }
        Ok(serde_json::Value::Null)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<SnapshotNode>> {
        let page = self.loaded()?;
        let selector = parse_selector(selector)?;
        let document = lock(&page.document)?;
        let nodes = document
            .select(&selector)
            .map(|element| SnapshotNode {
                document: Arc::clone(&page.document),
                id: element.id(),
                page_url: Arc::clone(&page.url),
            })
            .collect();
        Ok(nodes)
    }

    async fn quit(self) -> Result<()> {
        Ok(())
    }
}

/// Handle to one element of a parsed snapshot page.
#[derive(Clone)]
pub struct SnapshotNode {
    document: SharedDocument,
    id: NodeId,
    page_url: Arc<str>,
}

impl SnapshotNode {
    /// Stand-alone node for a markup fragment; its first element becomes the node.
    pub fn from_html(html: &str, page_url: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let id = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .map(|element| element.id())
            .unwrap_or_else(|| fragment.root_element().id());
        Self {
            document: Arc::new(Mutex::new(fragment)),
            id,
            page_url: Arc::from(page_url),
        }
    }

    fn handle(&self, id: NodeId) -> Self {
        Self {
            document: Arc::clone(&self.document),
            id,
            page_url: Arc::clone(&self.page_url),
        }
    }

    fn with_element<T>(&self, f: impl FnOnce(ElementRef<'_>) -> Result<T>) -> Result<T> {
        let document = lock(&self.document)?;
        let element = document
            .tree
            .get(self.id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| anyhow!("Snapshot node is not an element"))?;
        f(element)
    }
}

#[async_trait]
impl DomNode for SnapshotNode {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Self>> {
        let selector = parse_selector(selector)?;
        let ids: Vec<NodeId> =
            self.with_element(|own| Ok(own.select(&selector).map(|el| el.id()).collect()))?;
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    async fn text(&self) -> Result<String> {
        self.with_element(|own| Ok(clean_text(&own.text().collect::<Vec<_>>().join(" "))))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.with_element(|own| {
            Ok(own.value().attr(name).map(|value| match name {
                "href" | "src" => absolutize(&self.page_url, value),
                _ => value.to_string(),
            }))
        })
    }

    async fn click(&self) -> Result<()> {
        Ok(())
    }
}

fn lock(document: &SharedDocument) -> Result<std::sync::MutexGuard<'_, Html>> {
    document
        .lock()
        .map_err(|_| anyhow!("Snapshot document lock poisoned"))
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector '{}': {:?}", selector, e))
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve `href` against the page it appeared on; unparseable input is kept as is
pub fn absolutize(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserSession;

    const PAGE: &str = r#"
        <html><body>
          <ul>
            <li class="card"><h2><a href="/viewjob?jk=1">One</a></h2></li>
            <li class="card"><h2><a href="https://other.example/2">Two</a></h2></li>
          </ul>
        </body></html>
    "#;

    const TABLE_PAGE: &str = r#"
        <html><body>
          <div class="job_seen_beacon">
            <table class="jobCard_mainContent"><tbody><tr>
              <td class="resultContent">
                <h2 class="jobTitle"><a href="/rc/clk?jk=7">Rust Engineer</a></h2>
                <div class="companyLocation">Remote</div>
              </td>
            </tr></tbody></table>
          </div>
        </body></html>
    "#;

    async fn session_with(url: &str, html: &str) -> SnapshotSession {
        let launcher = SnapshotLauncher::new().with_page(url, html);
        let session = launcher.launch(&LaunchConfig::default()).await.unwrap();
        session.navigate(url).await.unwrap();
        session
    }

    async fn session() -> SnapshotSession {
        session_with("https://jobs.example/search?q=rust", PAGE).await
    }

    #[tokio::test]
    async fn test_finds_cards_and_resolves_links() {
        let session = session().await;
        let cards = session.find_elements("li.card").await.unwrap();
        assert_eq!(cards.len(), 2);

        let anchors = cards[0].find_elements("h2 a").await.unwrap();
        assert_eq!(anchors[0].text().await.unwrap(), "One");
        assert_eq!(
            anchors[0].attribute("href").await.unwrap().as_deref(),
            Some("https://jobs.example/viewjob?jk=1")
        );
    }

    #[tokio::test]
    async fn test_table_cells_are_readable() {
        let session = session_with("https://www.indeed.com/jobs?q=rust", TABLE_PAGE).await;
        let cards = session.find_elements(".job_seen_beacon").await.unwrap();
        assert_eq!(cards.len(), 1);

        let cells = cards[0].find_elements("td.resultContent").await.unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].text().await.unwrap(), "Rust Engineer Remote");

        let location = cells[0].find_elements(".companyLocation").await.unwrap();
        assert_eq!(location[0].text().await.unwrap(), "Remote");

        let links = cards[0].find_elements("td h2 a").await.unwrap();
        assert_eq!(
            links[0].attribute("href").await.unwrap().as_deref(),
            Some("https://www.indeed.com/rc/clk?jk=7")
        );
    }

    #[tokio::test]
    async fn test_node_queries_exclude_the_node_itself() {
        let node = SnapshotNode::from_html("<div class=\"x\"><div class=\"x\">inner</div></div>", "https://a/b");
        let matches = node.find_elements("div.x").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text().await.unwrap(), "inner");
    }

    #[tokio::test]
    async fn test_page_height_is_constant() {
        let session = session().await;
        let first = session.execute_script("return document.body.scrollHeight").await.unwrap();
        session.execute_script("window.scrollTo(0, document.body.scrollHeight);").await.unwrap();
        let second = session.execute_script("return document.body.scrollHeight").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_page_fails_navigation() {
        let launcher = SnapshotLauncher::new();
        let session = launcher.launch(&LaunchConfig::default()).await.unwrap();
        assert!(session.navigate("https://nowhere.example").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_selector_is_an_error() {
        let session = session().await;
        assert!(session.find_elements("li[").await.is_err());
    }

    #[test]
    fn test_absolutize() {
        let page = "https://www.indeed.com/jobs?q=python";
        assert_eq!(absolutize(page, "/rc/clk?jk=9"), "https://www.indeed.com/rc/clk?jk=9");
        assert_eq!(absolutize(page, "//cdn.example/x"), "https://cdn.example/x");
        assert_eq!(absolutize(page, "https://a.example/b"), "https://a.example/b");
        assert_eq!(absolutize(page, "viewjob?jk=2"), "https://www.indeed.com/viewjob?jk=2");
        assert_eq!(
            absolutize(page, "?q=python&start=10"),
            "https://www.indeed.com/jobs?q=python&start=10"
        );
        assert_eq!(
            absolutize(page, "HTTPS://www.indeed.com/viewjob?jk=1"),
            "https://www.indeed.com/viewjob?jk=1"
        );
        assert_eq!(
            absolutize("https://www.linkedin.com/jobs/search/", "../view/123"),
            "https://www.linkedin.com/jobs/view/123"
        );
    }

    #[test]
    fn test_absolutize_keeps_raw_value_without_a_base() {
        assert_eq!(absolutize("not a url", "/viewjob?jk=1"), "/viewjob?jk=1");
    }
}
