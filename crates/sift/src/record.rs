// ABOUTME: Record type shared by every extraction strategy, plus its values and provenance markers.
// ABOUTME: Fields keep insertion order; provenance indices live beside the fields, not among them.

use std::borrow::Cow;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub const TABLE_INDEX: &str = "_table_index";
pub const LIST_INDEX: &str = "_list_index";
pub const ITEM_INDEX: &str = "_item_index";
pub const CARD_INDEX: &str = "_card_index";
pub const PRODUCT_INDEX: &str = "_product_index";

/// Appended to a field name that would shadow a provenance marker in flat output.
pub const SHADOWED_FIELD_SUFFIX: &str = "_field";

/// A hyperlink collected by the generic strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub text: String,
}

/// An extracted value.
///
/// Almost everything is text; a few archetypes also report a count or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Count(usize),
    List(Vec<String>),
    Links(Vec<Link>),
}

impl Value {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for empty text. Counts and lists are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Renders the value as a single flat cell (lists become JSON arrays).
    pub fn to_cell(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Count(n) => n.to_string(),
            Value::List(items) => serde_json::to_string(items).unwrap_or_default(),
            Value::Links(links) => serde_json::to_string(links).unwrap_or_default(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Count(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<Link>> for Value {
    fn from(links: Vec<Link>) -> Self {
        Value::Links(links)
    }
}

/// Which container on the page produced a record.
///
/// Indices are positions among all containers of that kind on the page,
/// including ones that yielded nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Table { table: usize },
    ListItem { list: usize, item: usize },
    Card { card: usize },
    Product { product: usize },
}

impl Provenance {
    /// The flattened `(name, index)` pairs used when serializing.
    pub fn entries(&self) -> Vec<(&'static str, usize)> {
        match *self {
            Provenance::Table { table } => vec![(TABLE_INDEX, table)],
            Provenance::ListItem { list, item } => vec![(LIST_INDEX, list), (ITEM_INDEX, item)],
            Provenance::Card { card } => vec![(CARD_INDEX, card)],
            Provenance::Product { product } => vec![(PRODUCT_INDEX, product)],
        }
    }
}

/// An ordered mapping of field name to extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
    provenance: Option<Provenance>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record tagged with its source container.
    pub fn with_provenance(provenance: Provenance) -> Self {
        Self {
            fields: Vec::new(),
            provenance: Some(provenance),
        }
    }

    /// Sets a field. An existing field keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        debug_assert!(!name.is_empty(), "record field names must not be empty");
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Sets a field only when a value is present.
    pub fn insert_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Shortcut for a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates the extracted fields in insertion order (provenance excluded).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn provenance(&self) -> Option<Provenance> {
        self.provenance
    }

    /// Number of extracted fields (provenance excluded).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when at least one field holds something other than empty text.
    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.is_blank())
    }

    fn markers(&self) -> Vec<(&'static str, usize)> {
        self.provenance.map(|p| p.entries()).unwrap_or_default()
    }

    /// Flat names of the fields, in order. A field named like one of this
    /// record's provenance markers gets [`SHADOWED_FIELD_SUFFIX`] appended
    /// (repeatedly, until the name is free).
    fn field_columns(&self) -> Vec<Cow<'_, str>> {
        let markers = self.markers();
        let taken = |name: &str| markers.iter().any(|(m, _)| *m == name) || self.contains(name);
        self.fields
            .iter()
            .map(|(k, _)| {
                if !markers.iter().any(|(m, _)| m == k) {
                    return Cow::Borrowed(k.as_str());
                }
                let mut name = format!("{k}{SHADOWED_FIELD_SUFFIX}");
                while taken(&name) {
                    name.push_str(SHADOWED_FIELD_SUFFIX);
                }
                Cow::Owned(name)
            })
            .collect()
    }

    /// All flat column names, fields first, then provenance markers.
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = self.field_columns().into_iter().map(Cow::into_owned).collect();
        cols.extend(self.markers().into_iter().map(|(k, _)| k.to_string()));
        cols
    }

    /// Looks up a flat cell by column name, provenance included.
    pub fn cell(&self, column: &str) -> Option<String> {
        let field = self
            .field_columns()
            .iter()
            .zip(&self.fields)
            .find(|(name, _)| **name == column)
            .map(|(_, (_, v))| v.to_cell());
        field.or_else(|| {
            self.markers()
                .into_iter()
                .find(|(k, _)| *k == column)
                .map(|(_, i)| i.to_string())
        })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let markers = self.markers();
        let mut map = serializer.serialize_map(Some(self.fields.len() + markers.len()))?;
        for (name, (_, v)) in self.field_columns().iter().zip(&self.fields) {
            map.serialize_entry(name, v)?;
        }
        for (k, i) in markers {
            map.serialize_entry(k, &i)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn insert_overwrites_in_place() {
        let mut rec = Record::new();
        rec.insert("a", "1");
        rec.insert("b", "2");
        rec.insert("a", "3");
        let names: Vec<&str> = rec.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(rec.text("a"), Some("3"));
    }

    #[test]
    fn provenance_is_kept_apart_from_fields() {
        let mut rec = Record::with_provenance(Provenance::Table { table: 2 });
        rec.insert("index", "7");
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.text("index"), Some("7"));
        assert_eq!(rec.provenance(), Some(Provenance::Table { table: 2 }));
        assert_eq!(rec.cell(TABLE_INDEX), Some("2".to_string()));
    }

    #[test]
    fn serializes_flat_with_index_markers() {
        let mut rec = Record::with_provenance(Provenance::ListItem { list: 1, item: 4 });
        rec.insert("text", "Hello");
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            json!({"text": "Hello", "_list_index": 1, "_item_index": 4})
        );
    }

    #[test]
    fn field_named_like_a_marker_is_renamed_in_flat_output() {
        let mut rec = Record::with_provenance(Provenance::Table { table: 0 });
        rec.insert(TABLE_INDEX, "x");
        rec.insert("_table_index_field", "y");
        rec.insert("Name", "a");

        assert_eq!(rec.text(TABLE_INDEX), Some("x"));
        assert_eq!(
            rec.columns(),
            vec![
                "_table_index_field_field",
                "_table_index_field",
                "Name",
                "_table_index"
            ]
        );
        assert_eq!(rec.cell("_table_index_field_field"), Some("x".to_string()));
        assert_eq!(rec.cell(TABLE_INDEX), Some("0".to_string()));

        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            json,
            r#"{"_table_index_field_field":"x","_table_index_field":"y","Name":"a","_table_index":0}"#
        );
    }

    #[test]
    fn marker_names_are_free_without_provenance() {
        let mut rec = Record::new();
        rec.insert(TABLE_INDEX, "x");
        assert_eq!(rec.columns(), vec![TABLE_INDEX]);
        assert_eq!(serde_json::to_value(&rec).unwrap(), json!({"_table_index": "x"}));
    }

    #[test]
    fn serializes_links_and_counts() {
        let mut rec = Record::new();
        rec.insert("type", "links");
        rec.insert(
            "links",
            vec![Link {
                url: "/a".to_string(),
                text: "About".to_string(),
            }],
        );
        rec.insert("word_count", 3usize);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            json!({"type": "links", "links": [{"url": "/a", "text": "About"}], "word_count": 3})
        );
    }

    #[test]
    fn has_content_ignores_empty_text() {
        let mut rec = Record::new();
        rec.insert("a", "");
        assert!(!rec.has_content());
        rec.insert("b", Vec::<String>::new());
        assert!(rec.has_content());
    }

    #[test]
    fn cell_renders_lists_as_json() {
        let mut rec = Record::new();
        rec.insert("images", vec!["a.png".to_string(), "b.png".to_string()]);
        assert_eq!(rec.cell("images"), Some(r#"["a.png","b.png"]"#.to_string()));
        assert_eq!(rec.cell("missing"), None);
    }
}
