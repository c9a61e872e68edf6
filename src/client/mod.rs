// Client module: the service seam and its HTTP implementation.

pub mod fetcher;
pub mod traits;

pub use fetcher::HttpCrawlClient;
pub use traits::CrawlService;
