pub mod balancer;
pub mod client;
pub mod config;
pub mod encoding;
pub mod model;
pub mod response;

pub use balancer::BalancedCrawlClient;
pub use client::{CrawlService, HttpCrawlClient};
pub use config::{load_config, ClientConfig, ConfigError};
pub use encoding::EscapeMode;
pub use model::{CrawlError, CrawlResult, Endpoint, ProcessedHtml};

/// Crawls `urls` through the crawler on `localhost:9811` with js rendering on.
pub fn crawl(urls: &[String]) -> Result<CrawlResult, CrawlError> {
    HttpCrawlClient::new(&ClientConfig::default())?.crawl(urls)
}
