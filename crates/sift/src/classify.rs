// ABOUTME: Rule-based page classifier that maps a parsed document to one structural archetype.
// ABOUTME: Rules are plain data evaluated top to bottom; the first one that fires decides.

//! Page classification.
//!
//! The classifier is an ordered table of [`Rule`]s. Each rule names a
//! [`Signal`] to measure on the page, a threshold the measurement must exceed,
//! and the [`PageType`] it yields. Rules are measured lazily in order, so a
//! page with a data table is never inspected for cards. When nothing fires
//! the page is [`PageType::Generic`].

use std::fmt;
use std::str::FromStr;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::patterns::{ARTICLE_HINT, CARD, GRID_ITEM, PRODUCT_OR_ITEM, TILE};
use crate::dom::{direct_children, ClassPattern, Page, Scope};

/// Structural archetype of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Table,
    List,
    Cards,
    Article,
    Products,
    Generic,
}

impl PageType {
    pub const ALL: [PageType; 6] = [
        PageType::Table,
        PageType::List,
        PageType::Cards,
        PageType::Article,
        PageType::Products,
        PageType::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Table => "table",
            PageType::List => "list",
            PageType::Cards => "cards",
            PageType::Article => "article",
            PageType::Products => "products",
            PageType::Generic => "generic",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(PageType::Table),
            "list" => Ok(PageType::List),
            "cards" => Ok(PageType::Cards),
            "article" => Ok(PageType::Article),
            "products" | "ecommerce" => Ok(PageType::Products),
            "generic" => Ok(PageType::Generic),
            other => Err(format!("unknown page type: {other}")),
        }
    }
}

/// Words whose presence in the page text hints at a shop.
pub const COMMERCE_KEYWORDS: &[&str] = &["product", "item", "price", "cart", "buy"];

static COMMERCE_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(COMMERCE_KEYWORDS).unwrap());

/// Something measurable on a page.
#[derive(Debug)]
pub enum Signal {
    /// Largest `<tr>` count of any `<table>`.
    TableRows,
    /// Elements matching `pattern`, counted only when the lower-cased visible text
    /// contains one of the commerce keywords; zero otherwise.
    Commerce { pattern: &'static Lazy<ClassPattern> },
    /// Largest single match count among `patterns`. Counts are never summed.
    BestClassCount {
        patterns: &'static [&'static Lazy<ClassPattern>],
    },
    /// Largest number of direct `<li>` children of any `<ul>`/`<ol>`.
    ListItems,
    /// `<article>` elements, or 1 when any class matches `pattern`.
    ArticleMarkup { pattern: &'static Lazy<ClassPattern> },
}

impl Signal {
    /// Measures the signal on a page.
    pub fn measure(&self, page: &Page) -> usize {
        let scope = page.scope();
        match self {
            Signal::TableRows => scope
                .find_all_by_tag(&["table"])
                .map(|table| Scope::within(table).find_all_by_tag(&["tr"]).count())
                .max()
                .unwrap_or(0),
            Signal::Commerce { pattern } => {
                let text = page.visible_text().to_lowercase();
                if COMMERCE_MATCHER.is_match(&text) {
                    scope.count_by_class(pattern)
                } else {
                    0
                }
            }
            Signal::BestClassCount { patterns } => patterns
                .iter()
                .map(|p| scope.count_by_class(p))
                .max()
                .unwrap_or(0),
            Signal::ListItems => scope
                .find_all_by_tag(&["ul", "ol"])
                .map(|list| direct_children(list, "li").count())
                .max()
                .unwrap_or(0),
            Signal::ArticleMarkup { pattern } => {
                let articles = scope.find_all_by_tag(&["article"]).count();
                if articles > 0 {
                    articles
                } else {
                    usize::from(scope.find_first_by_class(pattern).is_some())
                }
            }
        }
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct Rule {
    pub page_type: PageType,
    pub signal: Signal,
    /// The measurement must be strictly greater than this.
    pub threshold: usize,
}

impl Rule {
    pub fn fires(&self, measurement: usize) -> bool {
        measurement > self.threshold
    }
}

/// Classification rules in priority order.
pub static RULES: [Rule; 5] = [
    // header plus at least two data rows
    Rule {
        page_type: PageType::Table,
        signal: Signal::TableRows,
        threshold: 2,
    },
    Rule {
        page_type: PageType::Products,
        signal: Signal::Commerce {
            pattern: &PRODUCT_OR_ITEM,
        },
        threshold: 3,
    },
    Rule {
        page_type: PageType::Cards,
        signal: Signal::BestClassCount {
            patterns: &[&CARD, &TILE, &GRID_ITEM],
        },
        threshold: 3,
    },
    Rule {
        page_type: PageType::List,
        signal: Signal::ListItems,
        threshold: 5,
    },
    Rule {
        page_type: PageType::Article,
        signal: Signal::ArticleMarkup {
            pattern: &ARTICLE_HINT,
        },
        threshold: 0,
    },
];

/// Walks `rules` in order and returns the type of the first rule whose
/// measurement fires. Rules after it are never measured.
pub fn first_firing<F>(rules: &[Rule], mut measure: F) -> PageType
where
    F: FnMut(&Rule) -> usize,
{
    for rule in rules {
        let measurement = measure(rule);
        if rule.fires(measurement) {
            debug!(
                page_type = %rule.page_type,
                measurement,
                threshold = rule.threshold,
                "classification rule fired"
            );
            return rule.page_type;
        }
    }
    PageType::Generic
}

/// Classifies a page with the built-in rule table.
pub fn classify(page: &Page) -> PageType {
    first_firing(&RULES, |rule| rule.signal.measure(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(values: &[usize]) -> impl FnMut(&Rule) -> usize + '_ {
        let mut i = 0;
        move |_| {
            let v = values[i];
            i += 1;
            v
        }
    }

    #[test]
    fn rule_table_order_is_fixed() {
        let order: Vec<PageType> = RULES.iter().map(|r| r.page_type).collect();
        assert_eq!(
            order,
            vec![
                PageType::Table,
                PageType::Products,
                PageType::Cards,
                PageType::List,
                PageType::Article,
            ]
        );
        let thresholds: Vec<usize> = RULES.iter().map(|r| r.threshold).collect();
        assert_eq!(thresholds, vec![2, 3, 3, 5, 0]);
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(!RULES[0].fires(2));
        assert!(RULES[0].fires(3));
        assert!(!RULES[3].fires(5));
        assert!(RULES[3].fires(6));
        assert!(RULES[4].fires(1));
    }

    #[test]
    fn first_firing_rule_wins_without_measuring_the_rest() {
        let mut measured = Vec::new();
        let result = first_firing(&RULES, |rule| {
            measured.push(rule.page_type);
            match rule.page_type {
                PageType::Products => 10,
                _ => 100,
            }
        });
        assert_eq!(result, PageType::Table);
        assert_eq!(measured, vec![PageType::Table]);
    }

    #[test]
    fn falls_through_to_generic() {
        assert_eq!(
            first_firing(&RULES, measurements(&[2, 3, 3, 5, 0])),
            PageType::Generic
        );
        assert_eq!(
            first_firing(&RULES, measurements(&[0, 0, 4, 0, 0])),
            PageType::Cards
        );
    }

    #[test]
    fn classify_table_beats_cards() {
        let mut html = String::from("<table><tr><th>A</th></tr><tr><td>1</td></tr><tr><td>2</td></tr></table>");
        for i in 0..6 {
            html.push_str(&format!(r#"<div class="card">Card {i}</div>"#));
        }
        assert_eq!(classify(&Page::parse(&html)), PageType::Table);
    }

    #[test]
    fn classify_two_row_table_is_not_table() {
        let html = "<table><tr><th>A</th></tr><tr><td>1</td></tr></table>";
        assert_eq!(classify(&Page::parse(html)), PageType::Generic);
    }

    #[test]
    fn classify_commerce_needs_text_and_structure() {
        let containers: String = (0..4)
            .map(|i| format!(r#"<div class="product">Widget {i} costs $5</div>"#))
            .collect();
        let with_text = format!("<p>Add to cart</p>{containers}");
        assert_eq!(classify(&Page::parse(&with_text)), PageType::Products);

        let three: String = (0..3)
            .map(|i| format!(r#"<div class="product">Buy {i}</div>"#))
            .collect();
        assert_ne!(classify(&Page::parse(&three)), PageType::Products);
    }

    #[test]
    fn classify_commerce_without_keywords_falls_through() {
        // class names are not part of the page text
        let html: String = (0..5)
            .map(|i| format!(r#"<div class="product-tile">Widget {i}</div>"#))
            .collect();
        assert_eq!(classify(&Page::parse(&html)), PageType::Cards);
    }

    #[test]
    fn script_keywords_do_not_make_a_shop() {
        let cards: String = (0..4)
            .map(|i| format!(r#"<div class="grid-item"><h2>Story {i}</h2></div>"#))
            .collect();
        let with_script =
            format!("{cards}<script>localStorage.getItem('theme'); addToCart();</script>");
        assert_eq!(classify(&Page::parse(&with_script)), PageType::Cards);
        assert_eq!(classify(&Page::parse(&cards)), PageType::Cards);
    }

    #[test]
    fn classify_cards_uses_best_single_pattern() {
        let html = r#"
            <div class="card">a</div><div class="card">b</div>
            <div class="tile">c</div><div class="tile">d</div>
            <div class="grid-item">e</div><div class="grid-item">f</div>
        "#;
        assert_ne!(classify(&Page::parse(html)), PageType::Cards);

        let html = r#"
            <div class="tile">a</div><div class="tile">b</div>
            <div class="tile">c</div><div class="tile">d</div>
        "#;
        assert_eq!(classify(&Page::parse(html)), PageType::Cards);
    }

    #[test]
    fn classify_list_counts_direct_items_only() {
        let nested = r#"<ul>
            <li>1</li><li>2</li><li>3</li>
            <li>4<ol><li>x</li><li>y</li></ol></li>
        </ul>"#;
        assert_eq!(classify(&Page::parse(nested)), PageType::Generic);

        let long = "<ol><li>1</li><li>2</li><li>3</li><li>4</li><li>5</li><li>6</li></ol>";
        assert_eq!(classify(&Page::parse(long)), PageType::List);
    }

    #[test]
    fn classify_article_from_tag_or_class() {
        assert_eq!(
            classify(&Page::parse("<article><p>Hi</p></article>")),
            PageType::Article
        );
        assert_eq!(
            classify(&Page::parse(r#"<div class="blog-entry"><p>Hi</p></div>"#)),
            PageType::Article
        );
    }

    #[test]
    fn page_type_round_trips_through_strings() {
        for pt in PageType::ALL {
            assert_eq!(pt.as_str().parse::<PageType>(), Ok(pt));
        }
        assert_eq!("ecommerce".parse::<PageType>(), Ok(PageType::Products));
        assert!("gallery".parse::<PageType>().is_err());
    }
}
