// ABOUTME: CLI for sift: classify a page, extract its records, and write JSON or CSV.
// ABOUTME: Renders a URL over HTTP (optionally following pagination) or reads HTML from a file or stdin.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use sift_cli::{Destination, RendererBuilder, ScrapeConfig, Scraper};

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Classify web pages and extract structured records")]
struct Args {
    /// Page URL to render, or the base URL for --html input
    #[arg(long = "url")]
    url: Option<String>,

    /// HTML file to extract from instead of rendering; "-" reads stdin
    #[arg(long = "html")]
    html: Option<String>,

    /// Output file; .csv writes CSV, anything else JSON (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Follow next-page links, visiting at most this many pages
    #[arg(long = "pages")]
    pages: Option<usize>,

    /// CSS selector for the site's next-page control
    #[arg(long = "next-button")]
    next_button: Option<String>,

    /// JSON config with custom selectors and pagination settings
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// User-Agent header for requests
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Output compact JSON instead of pretty
    #[arg(long = "compact")]
    compact: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,
}

impl Args {
    /// File config with command-line overrides applied.
    fn scrape_config(&self) -> Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::load(path)?,
            None => ScrapeConfig::default(),
        };
        if let Some(pages) = self.pages {
            config.pagination = true;
            config.max_pages = pages;
        }
        if let Some(next_button) = &self.next_button {
            config.next_button = Some(next_button.clone());
        }
        Ok(config)
    }
}

fn load_html(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(target).with_context(|| format!("reading {}", target))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = args.scrape_config()?;
    let scraper = Scraper::new(&config)?;
    let destination = Destination::resolve(args.output.as_deref());

    let start = Instant::now();
    let outcome = if let Some(target) = &args.html {
        scraper.scrape_html(&load_html(target)?, args.url.as_deref())
    } else if let Some(url) = &args.url {
        let mut builder = RendererBuilder::new()
            .timeout(Duration::from_secs(args.timeout))
            .allow_private_networks(args.allow_private_networks);
        if let Some(user_agent) = &args.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let renderer = builder.build()?;
        scraper.scrape(&renderer, url).await?
    } else {
        bail!("either --url or --html is required");
    };
    let elapsed = start.elapsed();

    let types: Vec<&str> = outcome.page_types().iter().map(|t| t.as_str()).collect();
    info!(
        pages = outcome.pages.len(),
        page_types = %types.join(","),
        records = outcome.records.len(),
        "done"
    );

    let rendered = destination.render(&outcome.records, args.compact)?;
    match &destination.path {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), format = %destination.format, "saved");
        }
        None => println!("{}", rendered),
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    Ok(())
}
