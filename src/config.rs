// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::browser::{LaunchConfig, DEFAULT_USER_AGENT};
use crate::core::FsOps;
use crate::sources::{default_sources, SourceDefinition};

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub port: u16,
    /// JSON log output; stderr when unset.
    pub log_file: Option<PathBuf>,
    /// Replaces the built-in source list when present.
    pub sources: Option<Vec<SourceDefinition>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/jobs.db"),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            port: 8000,
            log_file: None,
            sources: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<AppConfig>,
    #[serde(default)]
    production: Option<AppConfig>,
}

impl AppConfig {
    /// Load configuration for the current environment.
    ///
    /// An explicit `path` must exist; the default `config.yaml` is optional.
    /// Nothing is logged here; callers log once a subscriber is installed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Self::environment();
        let config_path = Self::config_path(path);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_yaml(&content, &environment)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else if path.is_some() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.database_path = FsOps::resolve_path(&config.database_path)?;
        Ok(config)
    }

    /// File that `load` reads for `path`
    pub fn config_path(path: Option<&Path>) -> &Path {
        path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn environment() -> String {
        Self::environment_from(|key| std::env::var(key).ok())
    }

    fn environment_from(lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup("JOBSCOUT_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string())
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    /// Environment variables win over file values
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;
        }
        Ok(())
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            user_agent: self.user_agent.clone(),
            extra_args: Vec::new(),
        }
    }

    pub fn sources(&self) -> Vec<SourceDefinition> {
        self.sources.clone().unwrap_or_else(default_sources)
    }
}
