//! Node identifier newtype.
//!
//! External graph descriptions may name vertices with strings or integers.
//! Everything past the input boundary works with a single normalized form,
//! [`NodeId`], which wraps the string rendering of the client-supplied identifier.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized vertex identifier. Serializes as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId(n.to_string())
    }
}

// Lets `IndexMap<NodeId, _>` be queried with a plain `&str`.
impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_normalize_to_decimal_strings() {
        assert_eq!(NodeId::from(42i64), NodeId::from("42"));
        assert_eq!(NodeId::from(-7i64).as_str(), "-7");
    }

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId::from("A")), "A");
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&NodeId::from("B")).unwrap();
        assert_eq!(json, "\"B\"");
    }
}
