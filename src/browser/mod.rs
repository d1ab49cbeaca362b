// src/browser/mod.rs
//! Browser automation contract used by the scrapers.
//!
//! Scrapers only see these traits, so any binding that can query a rendered
//! page (a live WebDriver session, a saved HTML snapshot, a test fake) can
//! drive the pipeline.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub mod snapshot;
pub mod webdriver;

pub use snapshot::{SnapshotLauncher, SnapshotNode, SnapshotSession};
pub use webdriver::{WebDriverLauncher, WebDriverNode, WebDriverSession};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.7204.168 Safari/537.36";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One element of a rendered page.
#[async_trait]
pub trait DomNode: Sized + Send + Sync {
    /// Descendants of this node matching a CSS selector, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Self>>;

    /// Rendered text content.
    async fn text(&self) -> Result<String>;

    /// Attribute value. Link-like attributes come back as absolute URLs.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn click(&self) -> Result<()>;
}

/// A live page owned by exactly one scraper run.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Node: DomNode;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    async fn find_elements(&self, selector: &str) -> Result<Vec<Self::Node>>;

    /// Poll until any selector matches at least one element.
    /// Returns `false` once `timeout` elapses without a match.
    async fn wait_for_any(&self, selectors: &[String], timeout: Duration) -> Result<bool> {
        let combined = selectors.join(", ");
        let deadline = Instant::now() + timeout;
        loop {
            if !self.find_elements(&combined).await?.is_empty() {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Release the session. Called exactly once, on every exit path.
    async fn quit(self) -> Result<()>
    where
        Self: Sized;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self, config: &LaunchConfig) -> Result<Self::Session>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl LaunchConfig {
    /// Copy of this config with source-specific browser flags appended
    pub fn with_extra_args(&self, args: &[String]) -> Self {
        let mut config = self.clone();
        for arg in args {
            if !config.extra_args.contains(arg) {
                config.extra_args.push(arg.clone());
            }
        }
        config
    }

    /// Full Chrome argument list for this launch
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless".to_string());
        }
        args.extend(
            ["--no-sandbox", "--disable-dev-shm-usage", "--start-maximized"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.extend(self.extra_args.iter().cloned());
        args.push(format!("user-agent={}", self.user_agent));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_args_headless() {
        let config = LaunchConfig::default();
        let args = config.chrome_args();

        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.last().unwrap().starts_with("user-agent=Mozilla/5.0"));
    }

    #[test]
    fn test_extra_args_are_not_duplicated() {
        let flag = "--disable-blink-features=AutomationControlled".to_string();
        let config = LaunchConfig::default()
            .with_extra_args(&[flag.clone()])
            .with_extra_args(&[flag.clone()]);

        assert_eq!(config.extra_args, vec![flag]);
    }

    #[test]
    fn test_headful_launch_has_no_headless_flag() {
        let config = LaunchConfig {
            headless: false,
            ..LaunchConfig::default()
        };
        assert!(!config.chrome_args().contains(&"--headless".to_string()));
    }
}
