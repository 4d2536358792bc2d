use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of partial-search results from `POST /search/{index}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches for the query, across all pages
    #[serde(default)]
    pub total: u64,

    /// Row offset of this page
    #[serde(default)]
    pub start: u64,

    /// Matching rows, each carrying the projected attribute subset
    #[serde(default)]
    pub rows: Vec<SearchRow>,
}

/// One row of a partial-search response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRow {
    /// URL of the matching object
    #[serde(default)]
    pub url: Option<String>,

    /// Projected attributes, keyed by the names declared in the request body
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

impl SearchRow {
    /// Read a projected attribute as a string, if present and non-null.
    #[must_use]
    pub fn get_str(&self, attr: &str) -> Option<&str> {
        self.data.get(attr).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_string_projection() {
        let row: SearchRow = serde_json::from_value(json!({
            "url": "https://chef.example/nodes/node1",
            "data": {"name": "node1", "os": "ubuntu", "policy_name": null}
        }))
        .unwrap();

        assert_eq!(row.get_str("name"), Some("node1"));
        assert_eq!(row.get_str("policy_name"), None);
        assert_eq!(row.get_str("missing"), None);
    }
}
