// ABOUTME: JSON run configuration for the sift CLI: custom selectors and pagination settings.
// ABOUTME: Loaded from --config and merged with command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sift::ExtractionConfig;

/// Pages visited when pagination is on and no limit is given.
pub const DEFAULT_MAX_PAGES: usize = 5;

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

/// Run configuration as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Custom field selectors; heuristic extraction when absent.
    #[serde(default)]
    pub selectors: Option<ExtractionConfig>,
    #[serde(default)]
    pub pagination: bool,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default)]
    pub next_button: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            selectors: None,
            pagination: false,
            max_pages: DEFAULT_MAX_PAGES,
            next_button: None,
        }
    }
}

impl ScrapeConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Number of pages to visit, counting the first.
    pub fn page_limit(&self) -> usize {
        if self.pagination {
            self.max_pages.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_fields_are_missing() {
        let config = ScrapeConfig::from_json("{}").unwrap();
        assert_eq!(config, ScrapeConfig::default());
        assert_eq!(config.page_limit(), 1);
    }

    #[test]
    fn reads_selectors_in_order() {
        let config = ScrapeConfig::from_json(
            r#"{
                "selectors": {"container": ".row", "title": "h2", "price": ".cost"},
                "pagination": true,
                "next_button": "a.more"
            }"#,
        )
        .unwrap();
        let selectors = config.selectors.as_ref().unwrap();
        assert_eq!(
            selectors,
            &ExtractionConfig::new()
                .container(".row")
                .field("title", "h2")
                .field("price", ".cost")
        );
        assert_eq!(config.page_limit(), DEFAULT_MAX_PAGES);
        assert_eq!(config.next_button.as_deref(), Some("a.more"));
    }

    #[test]
    fn zero_max_pages_still_visits_first_page() {
        let config = ScrapeConfig::from_json(r#"{"pagination": true, "max_pages": 0}"#).unwrap();
        assert_eq!(config.page_limit(), 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ScrapeConfig::from_json(r#"{"pages": 3}"#).is_err());
    }
}
