// Tue Jan 13 2026 - Alex

use crate::model::PageRequest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://gorest.co.in/public/v2";
pub const DEFAULT_BRANCH_WORKERS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_idle_per_host: usize,
    pub client_name: String,
    pub access_token: Option<String>,
    pub branch_workers: usize,
    pub fetch_concurrency: usize,
    pub nested_fetch_concurrency: usize,
    pub page: u32,
    pub per_page: u32,
    pub pretty_output: bool,
}

/// Processor count minus one, never below one.
pub fn default_concurrency() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 2500,
            connect_timeout_ms: 5000,
            max_idle_per_host: 200,
            client_name: "gorest-client".to_string(),
            access_token: None,
            branch_workers: DEFAULT_BRANCH_WORKERS,
            fetch_concurrency: default_concurrency(),
            nested_fetch_concurrency: default_concurrency(),
            page: 0,
            per_page: 0,
            pretty_output: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn with_branch_workers(mut self, workers: usize) -> Self {
        self.branch_workers = workers;
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    pub fn with_nested_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.nested_fetch_concurrency = concurrency;
        self
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!("base_url must be http(s): {}", self.base_url)));
        }
        if self.branch_workers == 0 {
            return Err(ConfigError::Invalid("branch_workers must be greater than 0".to_string()));
        }
        if self.fetch_concurrency == 0 || self.nested_fetch_concurrency == 0 {
            return Err(ConfigError::Invalid("fetch concurrency must be greater than 0".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
