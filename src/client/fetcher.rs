use crate::client::traits::CrawlService;
use crate::config::ClientConfig;
use crate::encoding::{encode_urls, EscapeMode};
use crate::model::{CrawlError, CrawlResult, Endpoint, ProcessedHtml};
use crate::response::{parse_crawl_result, parse_processed};

use reqwest::blocking::Client;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Talks to one crawler service over blocking HTTP.
#[derive(Debug, Clone)]
pub struct HttpCrawlClient {
    client: Client,
    base_url: String,
    js: bool,
    escape: EscapeMode,
}

impl HttpCrawlClient {
    pub fn new(config: &ClientConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            js: config.js,
            escape: config.escape,
        })
    }

    /// Same settings and connection pool, different service.
    pub fn with_base_url(&self, base_url: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            js: self.js,
            escape: self.escape,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_url(&self, endpoint: Endpoint, urls: &[String]) -> String {
        format!(
            "{}/{}?js={}&urls={}",
            self.base_url,
            endpoint.path(),
            self.js,
            encode_urls(urls, self.escape)
        )
    }

    fn fetch(&self, endpoint: Endpoint, urls: &[String]) -> Result<String, CrawlError> {
        let url = self.request_url(endpoint, urls);
        debug!("from {} with js={} crawling {:?}", self.base_url, self.js, urls);

        let response = self.client.get(&url)
            .send()
            .map_err(|source| CrawlError::Http { url: url.clone(), source })?;

        let status = response.status();
        let body = response.text()
            .map_err(|source| CrawlError::Http { url: url.clone(), source })?;

        if !status.is_success() {
            warn!("Crawler at {} responded [{}]", self.base_url, status);
            return Err(CrawlError::Status { status: status.as_u16(), body });
        }

        Ok(body)
    }
}

impl CrawlService for HttpCrawlClient {
    fn crawl(&self, urls: &[String]) -> Result<CrawlResult, CrawlError> {
        let started = Instant::now();
        let body = self.fetch(Endpoint::Crawl, urls)?;
        let result = parse_crawl_result(&body)?;
        info!("crawling {} urls took {:?}", urls.len(), started.elapsed());
        Ok(result)
    }

    fn crawl_processed(&self, urls: &[String]) -> Result<BTreeMap<String, ProcessedHtml>, CrawlError> {
        let started = Instant::now();
        let body = self.fetch(Endpoint::CrawlProcessed, urls)?;
        let result = parse_processed(&body)?;
        info!("crawling and processing {} urls took {:?}", urls.len(), started.elapsed());
        Ok(result)
    }
}
