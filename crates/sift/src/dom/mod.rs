// ABOUTME: Read-only query facade over a parsed HTML document.
// ABOUTME: Offers tag, class-pattern and CSS lookups plus text/attribute helpers on scraper elements.

//! DOM query facade.
//!
//! Strategies never walk the tree directly; they ask a [`Scope`] for elements
//! by tag, by [`ClassPattern`], or by CSS selector, and read text and
//! attributes through the helpers here. A scope covers either the whole
//! document or the descendants of one element.

pub mod patterns;

use scraper::{ElementRef, Html, Selector};

pub use self::patterns::ClassPattern;

/// Elements whose text never renders.
const NON_VISIBLE: &[&str] = &["script", "style", "template"];

/// Heading tags in rank order.
pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// A parsed, immutable HTML document with an optional source URL.
#[derive(Debug)]
pub struct Page {
    html: Html,
    url: Option<String>,
}

impl Page {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            url: None,
        }
    }

    /// Records the URL the document was rendered from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// A scope over every element of the document, root included.
    pub fn scope(&self) -> Scope<'_> {
        Scope {
            el: self.root(),
            include_self: true,
        }
    }

    /// Text a reader would see, unnormalized. Contents of `script`, `style`
    /// and `template` elements are left out.
    pub fn visible_text(&self) -> String {
        self.root()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|el| NON_VISIBLE.contains(&el.value().name()));
                (!hidden).then_some(&**text)
            })
            .collect()
    }
}

/// A region of the document that queries are restricted to.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    el: ElementRef<'a>,
    include_self: bool,
}

impl<'a> Scope<'a> {
    /// A scope over the descendants of `el`, excluding `el` itself.
    pub fn within(el: ElementRef<'a>) -> Self {
        Self {
            el,
            include_self: false,
        }
    }

    pub fn element(self) -> ElementRef<'a> {
        self.el
    }

    /// Every element in the scope, in document order.
    pub fn elements(self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let skip = usize::from(!self.include_self);
        self.el.descendants().skip(skip).filter_map(ElementRef::wrap)
    }

    pub fn find_all_by_tag(self, tags: &'a [&'a str]) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements()
            .filter(move |el| tags.contains(&el.value().name()))
    }

    pub fn find_first_by_tag(self, tags: &[&str]) -> Option<ElementRef<'a>> {
        self.elements().find(|el| tags.contains(&el.value().name()))
    }

    pub fn find_all_by_class(
        self,
        pattern: &'a ClassPattern,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements().filter(move |el| pattern.matches(el))
    }

    pub fn find_first_by_class(self, pattern: &ClassPattern) -> Option<ElementRef<'a>> {
        self.elements().find(|el| pattern.matches(el))
    }

    /// Elements with the given tag whose class matches `pattern`.
    pub fn find_all_tagged_by_class(
        self,
        tag: &'a str,
        pattern: &'a ClassPattern,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements()
            .filter(move |el| el.value().name() == tag && pattern.matches(el))
    }

    pub fn count_by_class(self, pattern: &ClassPattern) -> usize {
        self.elements().filter(|el| pattern.matches(el)).count()
    }

    /// CSS matches inside the scope.
    pub fn select(self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let scope = self.el;
        self.el
            .select(selector)
            .filter(move |el| self.include_self || el.id() != scope.id())
    }

    pub fn select_first(self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    /// Normalized text of the scope element.
    pub fn text(self) -> String {
        text_of(self.el)
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The element's text content, whitespace-normalized. Inner newlines are
/// collapsed too, so multi-line cells come out on one line.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Keeps at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// A non-empty attribute value.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|v| !v.is_empty())
}

/// `src`, falling back to `data-src` for lazily loaded images.
pub fn image_source(img: ElementRef<'_>) -> Option<String> {
    attr(img, "src")
        .or_else(|| attr(img, "data-src"))
        .map(str::to_string)
}

/// The href of the first anchor in scope, when it has one.
pub fn first_link(scope: Scope<'_>) -> Option<String> {
    scope
        .find_first_by_tag(&["a"])
        .and_then(|a| attr(a, "href"))
        .map(str::to_string)
}

/// The source of the first image in scope, when it has one.
pub fn first_image(scope: Scope<'_>) -> Option<String> {
    scope.find_first_by_tag(&["img"]).and_then(image_source)
}

/// Direct element children with the given tag.
pub fn direct_children<'a>(
    el: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

/// The next sibling that is an element, skipping text and comments.
pub fn next_sibling_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}
