// ABOUTME: Locates the "next page" link of a paginated listing.
// ABOUTME: Tries a caller-supplied selector first, then common next-link conventions.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::dom::{attr, text_of, Page};
use crate::error::ConfigError;
use crate::selectors::parse_selector;

/// Built-in next-link selectors, tried after the custom one.
pub const NEXT_LINK_SELECTORS: &[&str] = &[
    "a[rel~='next']",
    "a[class*='next']",
    "[class*='pagination'] a:last-child",
];

/// Anchor text that reads as a "next" button.
static NEXT_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^next(\s+page)?\s*[›»>→]*$").unwrap());

/// Finds next-page URLs on listing pages.
#[derive(Debug, Clone)]
pub struct NextPageFinder {
    custom: Option<Selector>,
    builtin: Vec<Selector>,
}

impl NextPageFinder {
    /// `next_button` is an optional selector for the site's own next control.
    pub fn new(next_button: Option<&str>) -> Result<Self, ConfigError> {
        let custom = next_button
            .map(|css| parse_selector("next_button", css))
            .transpose()?;
        let builtin = NEXT_LINK_SELECTORS
            .iter()
            .map(|css| parse_selector("next_button", css))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { custom, builtin })
    }

    /// The absolute URL of the next page, if the page links to one.
    ///
    /// Relative links are resolved against the page URL; without one they are
    /// returned as written.
    pub fn find(&self, page: &Page) -> Option<String> {
        let scope = page.scope();

        let custom = self.custom.iter().flat_map(|sel| scope.select(sel));
        let by_rel = self.builtin[..1].iter().flat_map(|sel| scope.select(sel));
        let by_text = scope
            .find_all_by_tag(&["a"])
            .filter(|a| NEXT_TEXT.is_match(&text_of(*a)));
        let by_convention = self.builtin[1..].iter().flat_map(|sel| scope.select(sel));

        custom
            .chain(by_rel)
            .chain(by_text)
            .chain(by_convention)
            .find_map(|el| usable_href(el))
            .map(|href| resolve(page.url(), href))
    }
}

/// Hrefs that lead somewhere: not empty, not a fragment, not script.
fn usable_href(el: ElementRef<'_>) -> Option<&str> {
    let href = attr(el, "href")?.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty() || href.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    Some(href)
}

fn resolve(base: Option<&str>, href: &str) -> String {
    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

/// Next-page lookup with the built-in conventions only.
pub fn find_next_page(page: &Page) -> Option<String> {
    NextPageFinder::new(None).ok()?.find(page)
}
