use crate::model::{CrawlError, CrawlResult, ProcessedHtml};
use std::collections::BTreeMap;

pub trait CrawlService {
    fn crawl(&self, urls: &[String]) -> Result<CrawlResult, CrawlError>;

    fn crawl_processed(&self, urls: &[String]) -> Result<BTreeMap<String, ProcessedHtml>, CrawlError>;
}
