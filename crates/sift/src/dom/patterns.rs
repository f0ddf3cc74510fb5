// ABOUTME: Precompiled class-name patterns used by the classifier and the extraction strategies.
// ABOUTME: Each pattern is a regex searched against an element's full class attribute.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// A named regex matched against the `class` attribute of an element.
///
/// Matching is an unanchored, case-sensitive search over the whole attribute,
/// so `card` matches `product-card featured` and `product.*name` may span tokens.
#[derive(Debug)]
pub struct ClassPattern {
    name: &'static str,
    re: Regex,
}

impl ClassPattern {
    /// Compiles a pattern. Only called on the fixed tables below.
    fn compile(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            re: Regex::new(pattern).unwrap(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tests a raw class attribute value.
    pub fn matches_class(&self, class: &str) -> bool {
        self.re.is_match(class)
    }

    /// Tests an element; elements without a class never match.
    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        el.value()
            .attr("class")
            .is_some_and(|class| self.matches_class(class))
    }
}

macro_rules! class_pattern {
    ($ident:ident, $name:literal, $re:literal) => {
        pub static $ident: Lazy<ClassPattern> = Lazy::new(|| ClassPattern::compile($name, $re));
    };
}

// Classification and card detection
class_pattern!(PRODUCT_OR_ITEM, "product-or-item", r"product|item");
class_pattern!(CARD, "card", r"card");
class_pattern!(TILE, "tile", r"tile");
class_pattern!(GRID_ITEM, "grid-item", r"grid-item");
class_pattern!(BOX, "box", r"box");
class_pattern!(ARTICLE_HINT, "article-hint", r"article|post|blog|content");

// Field locators inside containers
class_pattern!(TITLE, "title", r"title");
class_pattern!(TITLE_OR_HEADING, "title-or-heading", r"title|heading");
class_pattern!(DESCRIPTION, "description", r"description|excerpt|summary");
class_pattern!(AUTHOR, "author", r"author|byline|writer");
class_pattern!(DATE, "date", r"date|published");
class_pattern!(CONTENT_BODY, "content-body", r"content|article|post-body");
class_pattern!(PRODUCT_NAME, "product-name", r"product.*name|title");
class_pattern!(PRICE, "price", r"price");
class_pattern!(RATING, "rating", r"rating|stars");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_substrings_of_class_tokens() {
        assert!(CARD.matches_class("product-card featured"));
        assert!(CARD.matches_class("cards"));
        assert!(!CARD.matches_class("Card"));
        assert!(GRID_ITEM.matches_class("col grid-item"));
        assert!(!GRID_ITEM.matches_class("grid item"));
    }

    #[test]
    fn product_name_may_span_tokens() {
        assert!(PRODUCT_NAME.matches_class("product-name"));
        assert!(PRODUCT_NAME.matches_class("product big name"));
        assert!(PRODUCT_NAME.matches_class("card-title"));
        assert!(!PRODUCT_NAME.matches_class("name"));
    }

    #[test]
    fn article_hint_covers_all_keywords() {
        for class in ["article-body", "post", "blog-entry", "main-content"] {
            assert!(ARTICLE_HINT.matches_class(class), "{class}");
        }
        assert!(!ARTICLE_HINT.matches_class("sidebar"));
    }

    #[test]
    fn element_without_class_never_matches() {
        let html = scraper::Html::parse_fragment(r#"<div>card</div>"#);
        let div = html
            .select(&scraper::Selector::parse("div").unwrap())
            .next()
            .unwrap();
        assert!(!CARD.matches(&div));
    }
}
