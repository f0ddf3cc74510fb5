// ABOUTME: Card strategy for grid layouts: picks the dominant card class pattern among <div>s.
// ABOUTME: Each card yields title, description, link and image, or a text snippet when untitled.

use once_cell::sync::Lazy;
use scraper::ElementRef;

use crate::dom::patterns::{BOX, CARD, DESCRIPTION, GRID_ITEM, TILE, TITLE_OR_HEADING};
use crate::dom::{first_image, first_link, text_of, truncate_chars, ClassPattern, Page, Scope, HEADINGS};
use crate::record::{Provenance, Record};

/// Candidate patterns in tie-break order.
static CARD_PATTERNS: [&Lazy<ClassPattern>; 4] = [&CARD, &TILE, &GRID_ITEM, &BOX];

/// Untitled cards keep this many characters of their text.
pub const TEXT_SNIPPET_CHARS: usize = 200;

/// The `<div>`s of the single pattern with the most matches.
///
/// Counts are never merged across patterns; on a tie the earlier pattern wins.
fn dominant_cards(page: &Page) -> Vec<ElementRef<'_>> {
    let mut best: Vec<ElementRef<'_>> = Vec::new();
    for pattern in CARD_PATTERNS {
        let found: Vec<_> = page.scope().find_all_tagged_by_class("div", pattern).collect();
        if found.len() > best.len() {
            best = found;
        }
    }
    best
}

fn card_record(card: ElementRef<'_>, card_index: usize) -> Record {
    let scope = Scope::within(card);
    let mut record = Record::with_provenance(Provenance::Card { card: card_index });

    let title = scope
        .find_first_by_tag(HEADINGS)
        .or_else(|| scope.find_first_by_class(&TITLE_OR_HEADING));
    record.insert_opt("title", title.map(text_of));
    record.insert_opt(
        "description",
        scope.find_first_by_class(&DESCRIPTION).map(text_of),
    );
    record.insert_opt("link", first_link(scope));
    record.insert_opt("image", first_image(scope));

    if !record.contains("title") {
        record.insert("text", truncate_chars(&text_of(card), TEXT_SNIPPET_CHARS));
    }
    record
}

pub fn extract(page: &Page) -> Vec<Record> {
    dominant_cards(page)
        .into_iter()
        .enumerate()
        .map(|(i, card)| card_record(card, i))
        .collect()
}
