// ABOUTME: Extraction dispatcher choosing between configured selectors and heuristic classification.
// ABOUTME: Returns the records together with the page type that produced them.

use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, PageType};
use crate::dom::Page;
use crate::error::ConfigError;
use crate::record::Record;
use crate::selectors::{CompiledSelectors, ExtractionConfig};
use crate::strategies;

/// The outcome of extracting one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// The archetype the records came from; `None` in selector mode.
    pub page_type: Option<PageType>,
    pub records: Vec<Record>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Classifies and extracts pages, or applies explicit selectors when configured.
///
/// Holds no per-page state; the same extractor can be reused across pages.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    selectors: Option<CompiledSelectors>,
}

impl Extractor {
    /// An extractor that always classifies.
    pub fn heuristic() -> Self {
        Self { selectors: None }
    }

    /// Validates `config` when given. A config always takes precedence over
    /// classification, even one without field mappings.
    pub fn new(config: Option<&ExtractionConfig>) -> Result<Self, ConfigError> {
        let selectors = config.map(ExtractionConfig::compile).transpose()?;
        Ok(Self { selectors })
    }

    /// True when pages bypass classification.
    pub fn uses_selectors(&self) -> bool {
        self.selectors.is_some()
    }

    pub fn extract(&self, page: &Page) -> Extraction {
        match &self.selectors {
            Some(selectors) => {
                let records = selectors.extract(page);
                debug!(records = records.len(), "extracted with configured selectors");
                Extraction {
                    page_type: None,
                    records,
                }
            }
            None => {
                let page_type = classify(page);
                debug!(%page_type, "classified page");
                Extraction {
                    page_type: Some(page_type),
                    records: strategies::extract(page_type, page),
                }
            }
        }
    }
}

/// One-shot helper: validate `config` (if any) and extract `page`.
pub fn dispatch(page: &Page, config: Option<&ExtractionConfig>) -> Result<Extraction, ConfigError> {
    Ok(Extractor::new(config)?.extract(page))
}
