// ABOUTME: Selector-driven extraction for callers that already know a page's layout.
// ABOUTME: A container selector plus field->selector pairs, validated up front and applied per container.

//! Selector-driven extraction.
//!
//! An [`ExtractionConfig`] is written as a JSON object whose `container` key
//! selects the repeating element and whose other keys name output fields:
//!
//! ```json
//! { "container": "div.listing", "title": "h2", "price": ".amount" }
//! ```
//!
//! Field order in the object is kept. Every selector is parsed when the config
//! is compiled, so a malformed one is reported before any page is touched.

use std::fmt;

use scraper::Selector;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::dom::{text_of, Page, Scope};
use crate::error::ConfigError;
use crate::record::Record;

/// Reserved key naming the container selector.
pub const CONTAINER_KEY: &str = "container";

/// Explicit extraction instructions that replace classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Selector for the repeating container; the whole document when unset.
    pub container: Option<String>,
    /// Output field name and selector, relative to each container.
    pub fields: Vec<(String, String)>,
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container selector.
    pub fn container(mut self, css: impl Into<String>) -> Self {
        self.container = Some(css.into());
        self
    }

    /// Adds (or replaces) a field mapping.
    pub fn field(mut self, name: impl Into<String>, css: impl Into<String>) -> Self {
        let name = name.into();
        let css = css.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = css,
            None => self.fields.push((name, css)),
        }
        self
    }

    /// Parses every selector, failing on the first malformed one.
    pub fn compile(&self) -> Result<CompiledSelectors, ConfigError> {
        let container = match &self.container {
            Some(css) => Some(parse_selector(CONTAINER_KEY, css)?),
            None => None,
        };

        let mut fields = Vec::with_capacity(self.fields.len());
        for (name, css) in &self.fields {
            if name.is_empty() {
                return Err(ConfigError::EmptyFieldName);
            }
            fields.push((name.clone(), parse_selector(name, css)?));
        }

        Ok(CompiledSelectors { container, fields })
    }
}

/// Parses one selector, naming `field` on failure.
pub fn parse_selector(field: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::malformed(field, css, e))
}

impl Serialize for ExtractionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + usize::from(self.container.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(container) = &self.container {
            map.serialize_entry(CONTAINER_KEY, container)?;
        }
        for (name, css) in &self.fields {
            map.serialize_entry(name, css)?;
        }
        map.end()
    }
}

struct ConfigVisitor;

impl<'de> Visitor<'de> for ConfigVisitor {
    type Value = ExtractionConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to CSS selectors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut config = ExtractionConfig::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if key == CONTAINER_KEY {
                if config.container.is_some() {
                    return Err(de::Error::duplicate_field(CONTAINER_KEY));
                }
                config.container = Some(value);
            } else {
                config = config.field(key, value);
            }
        }
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for ExtractionConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// A validated [`ExtractionConfig`], ready to run against pages.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    container: Option<Selector>,
    fields: Vec<(String, Selector)>,
}

impl CompiledSelectors {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// One record per container that matched at least one field.
    ///
    /// A field whose selector finds nothing is left out of that record.
    pub fn extract(&self, page: &Page) -> Vec<Record> {
        let containers: Vec<_> = match &self.container {
            Some(sel) => page.scope().select(sel).collect(),
            None => vec![page.root()],
        };
        debug!(containers = containers.len(), "selector extraction");

        containers
            .into_iter()
            .filter_map(|container| {
                let scope = Scope::within(container);
                let mut record = Record::new();
                for (name, sel) in &self.fields {
                    if let Some(el) = scope.select_first(sel) {
                        record.insert(name.as_str(), text_of(el));
                    }
                }
                (!record.is_empty()).then_some(record)
            })
            .collect()
    }
}
