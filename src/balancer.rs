// Spreads a URL list over several crawler services, one request per service
use crate::client::CrawlService;
use crate::model::{CrawlError, CrawlResult, ProcessedHtml};
use std::collections::BTreeMap;
use tracing::{debug, error};

pub struct BalancedCrawlClient<S> {
    services: Vec<S>,
}

/// Stable string hash (base 31, wrapping) reduced to a bucket index.
/// Zero buckets map everything to 0.
pub fn bucket(url: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let hash = url
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32));
    hash as usize % n
}

impl<S: CrawlService> BalancedCrawlClient<S> {
    pub fn new(services: Vec<S>) -> Result<Self, CrawlError> {
        if services.is_empty() {
            return Err(CrawlError::NoServices);
        }
        Ok(Self { services })
    }

    pub fn services(&self) -> &[S] {
        &self.services
    }

    /// URL groups keyed by the index of the service that gets them.
    pub fn buckets(&self, urls: &[String]) -> BTreeMap<usize, Vec<String>> {
        let mut buckets: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for url in urls {
            buckets
                .entry(bucket(url, self.services.len()))
                .or_default()
                .push(url.clone());
        }
        buckets
    }

    fn call_each<T, F>(&self, urls: &[String], call: F) -> Result<BTreeMap<String, T>, CrawlError>
    where
        F: Fn(&S, &[String]) -> Result<BTreeMap<String, T>, CrawlError>,
    {
        let mut all = BTreeMap::new();
        for (index, group) in self.buckets(urls) {
            debug!("service #{} gets {} urls", index, group.len());
            match call(&self.services[index], group.as_slice()) {
                Ok(part) => all.extend(part),
                Err(e) => {
                    error!("service #{} failed: {}", index, e);
                    return Err(e);
                }
            }
        }
        Ok(all)
    }
}

impl<S: CrawlService> CrawlService for BalancedCrawlClient<S> {
    fn crawl(&self, urls: &[String]) -> Result<CrawlResult, CrawlError> {
        let merged = self.call_each(urls, |service, group| {
            service.crawl(group).map(|result| result.into_iter().collect())
        })?;
        Ok(merged.into_iter().collect())
    }

    fn crawl_processed(&self, urls: &[String]) -> Result<BTreeMap<String, ProcessedHtml>, CrawlError> {
        self.call_each(urls, |service, group| service.crawl_processed(group))
    }
}
