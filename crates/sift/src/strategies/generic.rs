// ABOUTME: Fallback strategy for pages without a recognizable structure.
// ABOUTME: Emits one record per heading and a trailing record listing unique links.

use std::collections::HashMap;

use crate::dom::{attr, next_sibling_element, text_of, truncate_chars, Page, HEADINGS};
use crate::record::{Link, Record};

/// Sibling content attached to a heading is cut to this many characters.
pub const SIBLING_CONTENT_CHARS: usize = 500;

/// Anchor text must be longer than this to be listed.
const MIN_LINK_TEXT_CHARS: usize = 2;

fn heading_records(page: &Page) -> Vec<Record> {
    page.scope()
        .find_all_by_tag(HEADINGS)
        .map(|heading| {
            let mut record = Record::new();
            record.insert("type", heading.value().name());
            record.insert("text", text_of(heading));
            if let Some(sibling) = next_sibling_element(heading) {
                record.insert(
                    "content",
                    truncate_chars(&text_of(sibling), SIBLING_CONTENT_CHARS),
                );
            }
            record
        })
        .collect()
}

/// Unique links by href in first-seen order; a repeated href takes the latest text.
fn unique_links(page: &Page) -> Vec<Link> {
    let mut links: Vec<Link> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for anchor in page.scope().find_all_by_tag(&["a"]) {
        let Some(href) = attr(anchor, "href") else {
            continue;
        };
        let text = text_of(anchor);
        if text.chars().count() <= MIN_LINK_TEXT_CHARS {
            continue;
        }
        match positions.get(href) {
            Some(&at) => links[at].text = text,
            None => {
                positions.insert(href, links.len());
                links.push(Link {
                    url: href.to_string(),
                    text,
                });
            }
        }
    }
    links
}

pub fn extract(page: &Page) -> Vec<Record> {
    let mut records = heading_records(page);

    let links = unique_links(page);
    if !links.is_empty() {
        let mut record = Record::new();
        record.insert("type", "links");
        record.insert("links", links);
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn headings_and_deduplicated_links() {
        let html = r#"
            <h1>Welcome</h1>
            <p>Intro text</p>
            <div>
                <h2>Last</h2>
            </div>
            <a href="/about">About us</a>
            <a href="/x">ok</a>
            <a href="">Empty href</a>
            <a>No href here</a>
            <a href="/contact">Contact</a>
            <a href="/about">About again</a>
        "#;
        let records = extract(&Page::parse(html));
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([
                {"type": "h1", "text": "Welcome", "content": "Intro text"},
                {"type": "h2", "text": "Last"},
                {"type": "links", "links": [
                    {"url": "/about", "text": "About again"},
                    {"url": "/contact", "text": "Contact"}
                ]}
            ])
        );
    }

    #[test]
    fn sibling_content_is_truncated() {
        let long = "y".repeat(600);
        let html = format!("<h3>Title</h3><div>{long}</div>");
        let records = extract(&Page::parse(&html));
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].text("content").map(|c| c.len()),
            Some(SIBLING_CONTENT_CHARS)
        );
    }

    #[test]
    fn empty_sibling_still_reported() {
        let records = extract(&Page::parse("<h4>Alone</h4><hr>"));
        assert_eq!(records[0].text("content"), Some(""));
    }

    #[test]
    fn many_links_keep_first_seen_order() {
        let mut html = String::new();
        for i in 0..5000 {
            html.push_str(&format!(r#"<a href="/p/{i}">Page {i}</a>"#));
        }
        html.push_str(r#"<a href="/p/0">Page zero</a>"#);
        let links = unique_links(&Page::parse(&html));
        assert_eq!(links.len(), 5000);
        assert_eq!(links[0].text, "Page zero");
        assert_eq!(links[4999].url, "/p/4999");
    }

    #[test]
    fn no_links_record_without_links() {
        let records = extract(&Page::parse("<p>just text</p>"));
        assert!(records.is_empty());
    }
}
