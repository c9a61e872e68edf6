// Core types: CrawlResult, ProcessedHtml, Endpoint, CrawlError
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw answer of the `crawl` endpoint: url -> whatever the service put there.
pub type CrawlResult = Map<String, Value>;

/// One page as returned by the `crawl_processed` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessedHtml {
    pub title: String,
    pub content: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Crawl,
    CrawlProcessed,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Crawl => "crawl",
            Endpoint::CrawlProcessed => "crawl_processed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("crawler responded with status {status}")]
    Status { status: u16, body: String },

    #[error("crawler response is not a JSON object: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("no crawler services configured")]
    NoServices,
}

impl CrawlError {
    /// Raw response body, when the service answered with something unusable.
    pub fn body(&self) -> Option<&str> {
        match self {
            CrawlError::Status { body, .. } | CrawlError::InvalidJson { body, .. } => Some(body),
            _ => None,
        }
    }
}
