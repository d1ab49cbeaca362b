// src/browser/webdriver.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::info;

use super::{BrowserLauncher, BrowserSession, DomNode, LaunchConfig};

/// Launches Chrome through a running chromedriver / Selenium endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebDriverLauncher;

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self, config: &LaunchConfig) -> Result<WebDriverSession> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in config.chrome_args() {
            caps.add_arg(&arg)
                .with_context(|| format!("Invalid Chrome argument: {}", arg))?;
        }

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("Failed to start browser via {}", config.webdriver_url))?;

        info!("Browser session started via {}", config.webdriver_url);
        Ok(WebDriverSession { driver })
    }
}

pub struct WebDriverSession {
    driver: WebDriver,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Node = WebDriverNode;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.driver
            .goto(url)
            .await
            .with_context(|| format!("Failed to load {}", url))
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        let value: serde_json::Value = self
            .driver
            .execute(script, Vec::new())
            .await
            .context("Script execution failed")?
            .convert()?;
        Ok(value)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<WebDriverNode>> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        Ok(elements.into_iter().map(WebDriverNode).collect())
    }

    async fn quit(self) -> Result<()> {
        self.driver
            .quit()
            .await
            .context("Failed to shut down browser session")
    }
}

#[derive(Clone)]
pub struct WebDriverNode(WebElement);

#[async_trait]
impl DomNode for WebDriverNode {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Self>> {
        let elements = self.0.find_all(By::Css(selector)).await?;
        Ok(elements.into_iter().map(WebDriverNode).collect())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.0.text().await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        // The DOM property carries the resolved absolute URL for href/src.
        if let Some(value) = self.0.prop(name).await? {
            return Ok(Some(value));
        }
        Ok(self.0.attr(name).await?)
    }

    async fn click(&self) -> Result<()> {
        Ok(self.0.click().await?)
    }
}
