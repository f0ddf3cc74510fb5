// ABOUTME: Main library entry point for sift, the page classifier and record extractor.
// ABOUTME: Re-exports the public API: Page, PageType, Record, Extractor, ExtractionConfig, ConfigError.

//! Sift - classify rendered HTML pages and pull structured records out of them.
//!
//! A page is sorted into one of a handful of structural archetypes (table, list,
//! card grid, article, product listing, or generic) using cheap markup signals,
//! and the matching strategy turns it into a sequence of [`Record`]s. When the
//! caller already knows the layout, an [`ExtractionConfig`] of CSS selectors
//! replaces the heuristics entirely.
//!
//! # Example
//!
//! ```
//! use sift::{Extractor, Page, PageType};
//!
//! let html = r#"<table>
//!     <tr><th>Name</th><th>Score</th></tr>
//!     <tr><td>Alice</td><td>10</td></tr>
//!     <tr><td>Bob</td><td>7</td></tr>
//! </table>"#;
//!
//! let page = Page::parse(html);
//! let extraction = Extractor::heuristic().extract(&page);
//! assert_eq!(extraction.page_type, Some(PageType::Table));
//! assert_eq!(extraction.records.len(), 2);
//! ```

pub mod classify;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod formats;
pub mod pagination;
pub mod record;
pub mod selectors;
pub mod strategies;

pub use crate::classify::{classify, PageType};
pub use crate::dispatch::{dispatch, Extraction, Extractor};
pub use crate::dom::Page;
pub use crate::error::ConfigError;
pub use crate::formats::{to_csv, to_json, OutputFormat};
pub use crate::pagination::{find_next_page, NextPageFinder};
pub use crate::record::{Link, Provenance, Record, Value};
pub use crate::selectors::{CompiledSelectors, ExtractionConfig};
