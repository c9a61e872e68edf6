use crate::encoding::EscapeMode;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9811";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid crawler url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub js: bool,
    pub escape: EscapeMode,
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Several crawler services to spread URLs over; `base_url` is ignored when set.
    pub endpoints: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            js: true,
            escape: EscapeMode::default(),
            timeout_secs: None,
            user_agent: concat!("crawl-client/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoints: Vec::new(),
        }
    }
}

/// Values given on the command line; `None` and empty leave the config alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub endpoints: Vec<String>,
    pub js: Option<bool>,
    pub escape: Option<EscapeMode>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Applies `CRAWLER_URL`, `CRAWLER_JS` and `CRAWLER_TIMEOUT_SECS`.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CRAWLER_URL") {
            self.base_url = url;
        }
        if let Some(js) = lookup("CRAWLER_JS") {
            match js.trim().parse::<bool>() {
                Ok(v) => self.js = v,
                Err(_) => warn!("Ignoring CRAWLER_JS={:?}, expected true or false", js),
            }
        }
        if let Some(secs) = lookup("CRAWLER_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(v) => self.timeout_secs = Some(v),
                Err(_) => warn!("Ignoring CRAWLER_TIMEOUT_SECS={:?}, expected seconds", secs),
            }
        }
    }

    pub fn merge_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if !overrides.endpoints.is_empty() {
            self.endpoints = overrides.endpoints.clone();
        }
        if let Some(js) = overrides.js {
            self.js = js;
        }
        if let Some(escape) = overrides.escape {
            self.escape = escape;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
    }

    /// True when an endpoint list is set and `base_url` was changed from the
    /// default, so the latter has no effect.
    pub fn base_url_ignored(&self) -> bool {
        !self.endpoints.is_empty() && self.base_url != DEFAULT_BASE_URL
    }

    /// Base URLs requests go to: the endpoint list if any, else `base_url`.
    pub fn service_urls(&self) -> Vec<String> {
        if self.endpoints.is_empty() {
            vec![self.base_url.clone()]
        } else {
            self.endpoints.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for raw in self.service_urls() {
            check_base_url(&raw)?;
        }
        Ok(())
    }
}

fn check_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {}", other))),
    }
    if url.query().is_some() {
        return Err(invalid("must not contain a query".to_string()));
    }
    Ok(())
}

/// Defaults, then the config file, then the environment, then `overrides`.
pub fn build_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ClientConfig, ConfigError> {
    build_config_with(path, |key| env::var(key).ok(), overrides)
}

fn build_config_with<F>(
    path: Option<&Path>,
    lookup: F,
    overrides: &ConfigOverrides,
) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    config.apply_vars(lookup);
    config.merge_overrides(overrides);

    if config.base_url_ignored() {
        warn!(
            "base url {} is ignored, requests go to endpoints {:?}",
            config.base_url, config.endpoints
        );
    }

    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: ClientConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(config)
}
