// ABOUTME: Multi-page scraping: render, dispatch, and follow next-page links up to a limit.
// ABOUTME: The first page must succeed; later failures or repeated URLs end pagination quietly.

use std::collections::HashSet;

use serde::Serialize;
use sift::{ConfigError, Extractor, NextPageFinder, Page, PageType, Record};
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::error::NavigationError;
use crate::render::Renderer;

/// What one visited page contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub url: Option<String>,
    pub page_type: Option<PageType>,
    pub records: usize,
}

/// Records gathered across all visited pages, in visit order.
#[derive(Debug, Default, Serialize)]
pub struct ScrapeOutcome {
    pub pages: Vec<PageReport>,
    pub records: Vec<Record>,
}

impl ScrapeOutcome {
    /// Distinct page types seen, in first-seen order.
    pub fn page_types(&self) -> Vec<PageType> {
        let mut seen = Vec::new();
        for page_type in self.pages.iter().filter_map(|p| p.page_type) {
            if !seen.contains(&page_type) {
                seen.push(page_type);
            }
        }
        seen
    }
}

/// Drives extraction over one page or a chain of paginated pages.
#[derive(Debug, Clone)]
pub struct Scraper {
    extractor: Extractor,
    finder: NextPageFinder,
    page_limit: usize,
}

impl Scraper {
    /// Compiles every selector in `config` up front.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            extractor: Extractor::new(config.selectors.as_ref())?,
            finder: NextPageFinder::new(config.next_button.as_deref())?,
            page_limit: config.page_limit(),
        })
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Extracts from already-loaded HTML. Pagination needs a renderer, so only
    /// this page is used.
    pub fn scrape_html(&self, html: &str, url: Option<&str>) -> ScrapeOutcome {
        let mut page = Page::parse(html);
        if let Some(url) = url {
            page = page.with_url(url);
        }
        let mut outcome = ScrapeOutcome::default();
        if self.absorb(&page, &mut outcome).is_some() {
            debug!("next page link ignored for local input");
        }
        outcome
    }

    /// Renders `start` and follows next-page links until the page limit, a
    /// missing link, a repeated URL, or a failed render.
    pub async fn scrape(
        &self,
        renderer: &Renderer,
        start: &str,
    ) -> Result<ScrapeOutcome, NavigationError> {
        let mut outcome = ScrapeOutcome::default();
        let mut visited = HashSet::new();
        let mut next = Some(start.to_string());

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!(url = %url, "next page link repeats a visited URL, stopping");
                break;
            }

            let rendered = match renderer.render(&url).await {
                Ok(rendered) => rendered,
                Err(err) if outcome.pages.is_empty() => return Err(err),
                Err(err) => {
                    warn!(url = %url, error = %err, "could not load next page, stopping");
                    break;
                }
            };
            if rendered.final_url != rendered.url {
                debug!(from = %rendered.url, to = %rendered.final_url, "redirected");
                visited.insert(rendered.final_url.clone());
            }

            next = self.absorb(&rendered.to_page(), &mut outcome);
        }

        Ok(outcome)
    }

    /// Extracts one page into `outcome`, returning the next URL to visit when
    /// the page limit allows another page.
    fn absorb(&self, page: &Page, outcome: &mut ScrapeOutcome) -> Option<String> {
        let extraction = self.extractor.extract(page);
        let number = outcome.pages.len() + 1;
        info!(
            page = number,
            url = page.url().unwrap_or("-"),
            page_type = extraction.page_type.map(|t| t.as_str()).unwrap_or("custom"),
            records = extraction.len(),
            "extracted"
        );

        outcome.pages.push(PageReport {
            url: page.url().map(str::to_string),
            page_type: extraction.page_type,
            records: extraction.len(),
        });
        outcome.records.extend(extraction.records);

        if number >= self.page_limit {
            return None;
        }
        let next = self.finder.find(page);
        if next.is_none() {
            debug!(page = number, "no next page link");
        }
        next
    }
}
