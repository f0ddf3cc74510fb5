// ABOUTME: List strategy emitting one record per direct <li> of every sizable <ul>/<ol>.
// ABOUTME: Short lists are treated as navigation noise and skipped.

use crate::dom::{direct_children, first_link, text_of, Page, Scope};
use crate::record::{Provenance, Record};

/// Lists with fewer items than this are skipped.
pub const MIN_ITEMS: usize = 3;

pub fn extract(page: &Page) -> Vec<Record> {
    let mut records = Vec::new();

    for (list_index, list) in page.scope().find_all_by_tag(&["ul", "ol"]).enumerate() {
        let items: Vec<_> = direct_children(list, "li").collect();
        if items.len() < MIN_ITEMS {
            continue;
        }

        for (item_index, item) in items.into_iter().enumerate() {
            let mut record = Record::with_provenance(Provenance::ListItem {
                list: list_index,
                item: item_index,
            });
            record.insert("text", text_of(item));
            record.insert_opt("link", first_link(Scope::within(item)));
            records.push(record);
        }
    }

    records
}
