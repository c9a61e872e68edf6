use clap::Parser;
use crawl_client::config::{build_config, ConfigOverrides};
use crawl_client::{
    response, BalancedCrawlClient, ClientConfig, CrawlError, CrawlService, Endpoint, EscapeMode,
    HttpCrawlClient,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Send URLs to a rest-crawler service", long_about = None)]
struct CommandLineArgs {
    /// URLs to crawl
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// JSON config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Crawler base URL, e.g. http://localhost:9811
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Additional crawler service; URLs are spread over all given endpoints
    #[arg(long = "endpoint", value_name = "URL")]
    endpoints: Vec<String>,

    /// Ask the crawler not to render JavaScript
    #[arg(long)]
    no_js: bool,

    /// How the URL list is escaped before percent-encoding
    #[arg(long, value_enum)]
    escape: Option<EscapeMode>,

    /// Request timeout in seconds (none by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Use the crawl_processed endpoint
    #[arg(long)]
    processed: bool,

    /// Print the request URL and exit
    #[arg(long)]
    print_url: bool,

    /// Print the whole JSON result instead of its keys
    #[arg(long)]
    full: bool,
}

impl CommandLineArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            endpoints: self.endpoints.clone(),
            js: self.no_js.then_some(false),
            escape: self.escape,
            timeout_secs: self.timeout,
        }
    }
}

fn main() {
    // Initialize logging; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CommandLineArgs::parse();

    let config = match build_config(args.config.as_deref(), &args.overrides()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, &config) {
        error!("Crawl failed: {}", e);
        if let CrawlError::InvalidJson { body, .. } = &e {
            save_debug_body(body);
        }
        process::exit(1);
    }
}

fn run(args: &CommandLineArgs, config: &ClientConfig) -> Result<(), CrawlError> {
    let client = HttpCrawlClient::new(config)?;
    let services: Vec<HttpCrawlClient> = config
        .service_urls()
        .iter()
        .map(|url| client.with_base_url(url))
        .collect();

    let endpoint = if args.processed { Endpoint::CrawlProcessed } else { Endpoint::Crawl };

    if args.urls.is_empty() {
        warn!("No URLs given, sending an empty request");
    }

    let service: Box<dyn CrawlService> = if services.len() == 1 {
        let single = services.into_iter().next().ok_or(CrawlError::NoServices)?;
        if args.print_url {
            println!("{}", single.request_url(endpoint, &args.urls));
            return Ok(());
        }
        Box::new(single)
    } else {
        let balancer = BalancedCrawlClient::new(services)?;
        if args.print_url {
            for (index, group) in balancer.buckets(&args.urls) {
                println!("{}", balancer.services()[index].request_url(endpoint, &group));
            }
            return Ok(());
        }
        info!("Balancing over {} crawler services", balancer.services().len());
        Box::new(balancer)
    };

    if args.processed {
        let pages = service.crawl_processed(&args.urls)?;
        print_result(&pages, args.full);
    } else {
        let result = service.crawl(&args.urls)?;
        let result: BTreeMap<_, _> = result.into_iter().collect();
        print_result(&result, args.full);
    }
    Ok(())
}

fn print_result<T: Serialize>(result: &BTreeMap<String, T>, full: bool) {
    if full {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Failed to render result: {}", e),
        }
    } else {
        for key in result.keys() {
            println!("{}", key);
        }
    }
}

/// Keeps a body the crawler sent that was not JSON, for later inspection.
fn save_debug_body(body: &str) {
    match response::save_debug_body(Path::new(response::DEBUG_DUMP_DIR), body) {
        Ok(filename) => info!("Saved debug body: {}", filename.display()),
        Err(e) => warn!("Failed to write debug body: {}", e),
    }
}
