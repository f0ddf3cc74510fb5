// ABOUTME: Extraction strategies, one per page archetype.
// ABOUTME: Each strategy reads the page through the DOM facade and returns records, possibly none.

//! Per-archetype extraction strategies.
//!
//! Submodules:
//! - `table`: one record per data row of every table.
//! - `list`: one record per direct item of every sizable list.
//! - `cards`: one record per card of the dominant card pattern.
//! - `article`: a single record describing the page.
//! - `products`: one record per product-like container with a name or price.
//! - `generic`: headings plus a deduplicated link inventory.

pub mod article;
pub mod cards;
pub mod generic;
pub mod list;
pub mod products;
pub mod table;

use tracing::debug;

use crate::classify::PageType;
use crate::dom::Page;
use crate::record::Record;

/// Runs the strategy matching `page_type`.
pub fn extract(page_type: PageType, page: &Page) -> Vec<Record> {
    let records = match page_type {
        PageType::Table => table::extract(page),
        PageType::List => list::extract(page),
        PageType::Cards => cards::extract(page),
        PageType::Article => vec![article::extract(page)],
        PageType::Products => products::extract(page),
        PageType::Generic => generic::extract(page),
    };
    debug!(%page_type, records = records.len(), "strategy finished");
    records
}
