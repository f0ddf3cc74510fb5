// ABOUTME: Article strategy producing one record per page: title, author, date, body text and images.
// ABOUTME: Body paragraphs come from the best content container; images are collected page-wide.

use scraper::ElementRef;

use crate::dom::patterns::{AUTHOR, CONTENT_BODY, DATE, TITLE};
use crate::dom::{image_source, text_of, Page, Scope};
use crate::record::Record;

fn title(scope: Scope<'_>) -> Option<ElementRef<'_>> {
    scope
        .find_first_by_tag(&["h1"])
        .or_else(|| scope.find_first_by_class(&TITLE))
        .or_else(|| scope.find_first_by_tag(&["title"]))
}

fn date(scope: Scope<'_>) -> Option<ElementRef<'_>> {
    scope
        .find_first_by_tag(&["time", "date"])
        .or_else(|| scope.find_first_by_class(&DATE))
}

fn content_container(scope: Scope<'_>) -> Option<ElementRef<'_>> {
    scope
        .find_first_by_tag(&["article"])
        .or_else(|| scope.find_first_by_class(&CONTENT_BODY))
        .or_else(|| scope.find_first_by_tag(&["main"]))
}

/// Paragraph texts of the container, separated by blank lines.
fn body_text(container: ElementRef<'_>) -> String {
    Scope::within(container)
        .find_all_by_tag(&["p"])
        .map(text_of)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn extract(page: &Page) -> Record {
    let scope = page.scope();
    let mut record = Record::new();

    if let Some(url) = page.url() {
        record.insert("url", url);
    }
    record.insert_opt("title", title(scope).map(text_of));
    record.insert_opt("author", scope.find_first_by_class(&AUTHOR).map(text_of));
    record.insert_opt("date", date(scope).map(text_of));

    if let Some(container) = content_container(scope) {
        let content = body_text(container);
        let words = content.split_whitespace().count();
        record.insert("content", content);
        record.insert("word_count", words);
    }

    let images: Vec<String> = scope
        .find_all_by_tag(&["img"])
        .filter_map(image_source)
        .collect();
    record.insert("images", images);

    record
}
