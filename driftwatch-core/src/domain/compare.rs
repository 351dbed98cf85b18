//! Compare domain model
//!
//! Result of `GET /projects/{id}/repository/compare`.

use serde::{Deserialize, Serialize};

/// Branch comparison payload
///
/// Individual diff entries are kept opaque; only their presence is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compare {
    #[serde(default)]
    pub diffs: Vec<serde_json::Value>,
}

impl Compare {
    /// True when the comparison reports at least one changed file
    pub fn has_diff(&self) -> bool {
        !self.diffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_diff() {
        let compare: Compare = serde_json::from_str(
            r#"{"commits": [], "diffs": [{"old_path": "a.rs", "new_path": "a.rs"}]}"#,
        )
        .unwrap();
        assert!(compare.has_diff());

        let compare: Compare = serde_json::from_str(r#"{"commits": [], "diffs": []}"#).unwrap();
        assert!(!compare.has_diff());

        let compare: Compare = serde_json::from_str(r#"{"compare_same_ref": true}"#).unwrap();
        assert!(!compare.has_diff());
    }
}
