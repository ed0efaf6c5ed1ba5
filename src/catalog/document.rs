use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::orrery_errors::OrreryError;

/// A parsed catalog: a name and an ordered list of item records.
///
/// Items stay open-ended JSON objects until the resolver normalizes them, so one malformed item
/// fails on its own instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "bodies")]
    pub items: Vec<Value>,
}

impl CatalogDocument {
    pub fn new(name: &str, items: Vec<Value>) -> Self {
        CatalogDocument {
            name: name.to_string(),
            items,
        }
    }

    /// Parse a current-schema (JSON) catalog.
    ///
    /// Return
    /// ------
    /// * the document, or [`OrreryError::ParseError`] carrying the line reported by the JSON
    ///   parser
    pub fn from_json_str(text: &str) -> Result<Self, OrreryError> {
        serde_json::from_str(text).map_err(|e| OrreryError::ParseError {
            line: e.line(),
            message: e.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod test_document {
    use super::*;

    #[test]
    fn test_items_and_bodies_keys() {
        let a = CatalogDocument::from_json_str(r#"{"name": "A", "items": [{"name": "x"}]}"#).unwrap();
        let b = CatalogDocument::from_json_str(r#"{"name": "A", "bodies": [{"name": "x"}]}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.items.len(), 1);

        let empty = CatalogDocument::from_json_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_syntax_error_line() {
        let text = "{\n  \"name\": \"A\",\n  \"items\": [\n    {\"name\": }\n  ]\n}";
        let err = CatalogDocument::from_json_str(text).unwrap_err();
        assert!(matches!(err, OrreryError::ParseError { line: 4, .. }));
    }
}
