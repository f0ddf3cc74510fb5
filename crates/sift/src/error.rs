// ABOUTME: Error types for sift configuration handling.
// ABOUTME: Classification and extraction never fail; only caller-supplied selectors can.

use thiserror::Error;

/// Errors raised while validating a caller-supplied extraction configuration.
///
/// Markup problems are never errors: strategies return empty output instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A selector in the configuration could not be parsed.
    #[error("invalid selector for field `{field}` ({selector:?}): {reason}")]
    MalformedSelector {
        field: String,
        selector: String,
        reason: String,
    },

    /// A field mapping used an empty output name.
    #[error("field names must not be empty")]
    EmptyFieldName,
}

impl ConfigError {
    /// Creates a MalformedSelector error from a selector parse failure.
    pub fn malformed(
        field: impl Into<String>,
        selector: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        ConfigError::MalformedSelector {
            field: field.into(),
            selector: selector.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the offending field name, if the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MalformedSelector { field, .. } => Some(field),
            ConfigError::EmptyFieldName => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_selector_names_the_field() {
        let err = ConfigError::malformed("price", "[[[", "unexpected token");
        assert_eq!(err.field(), Some("price"));
        let msg = err.to_string();
        assert!(msg.contains("`price`"));
        assert!(msg.contains("\"[[[\""));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn empty_field_name_has_no_field() {
        assert_eq!(ConfigError::EmptyFieldName.field(), None);
    }
}
