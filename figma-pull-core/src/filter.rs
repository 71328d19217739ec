//! Node selection by type and page-bucket assignment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Sentinel that selects every node type.
pub const ALL: &str = "ALL";

/// Bucket for nodes sitting directly under the document.
pub const ROOT_PAGE: &str = "ROOT";

/// Set of uppercased node type tags eligible for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Selection {
    types: BTreeSet<String>,
}

impl Selection {
    /// Parses a comma separated list such as `"FRAME, component,,INSTANCE"`.
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn all() -> Self {
        [ALL].into_iter().collect()
    }

    /// The document root is never selected; otherwise `ALL` or an exact
    /// (uppercased) type match is required.
    pub fn selects(&self, node: &Node) -> bool {
        if node.is_document() {
            return false;
        }
        if self.types.contains(ALL) {
            return true;
        }
        node.type_tag()
            .is_some_and(|t| self.types.contains(&t.to_uppercase()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let types = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Selection { types }
    }
}

impl From<Vec<String>> for Selection {
    fn from(types: Vec<String>) -> Self {
        types.into_iter().collect()
    }
}

impl From<Selection> for Vec<String> {
    fn from(selection: Selection) -> Self {
        selection.types.into_iter().collect()
    }
}

/// Top-level page name for a breadcrumb path, or [`ROOT_PAGE`] above depth 2.
pub fn page_bucket(breadcrumbs: &[String]) -> &str {
    breadcrumbs.get(1).map(String::as_str).unwrap_or(ROOT_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(t: &str) -> Node {
        serde_json::from_value(json!({"type": t})).unwrap()
    }

    #[test]
    fn parse_normalises_and_drops_empty_entries() {
        let sel = Selection::parse("FRAME, component,,INSTANCE ");
        assert_eq!(Vec::<String>::from(sel), ["COMPONENT", "FRAME", "INSTANCE"]);
    }

    #[test]
    fn document_is_never_selected() {
        assert!(!Selection::all().selects(&node("DOCUMENT")));
        assert!(!Selection::parse("DOCUMENT").selects(&node("DOCUMENT")));
    }

    #[test]
    fn matches_case_insensitively() {
        let sel = Selection::parse("frame");
        assert!(sel.selects(&node("FRAME")));
        assert!(sel.selects(&node("Frame")));
        assert!(!sel.selects(&node("COMPONENT")));
        assert!(!sel.selects(&Node::default()));
    }

    #[test]
    fn empty_selection_selects_nothing() {
        assert!(!Selection::default().selects(&node("FRAME")));
        assert!(Selection::all().selects(&Node::default()));
    }

    #[test]
    fn page_bucket_uses_second_crumb() {
        let crumbs = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(page_bucket(&crumbs(&["Doc"])), "ROOT");
        assert_eq!(page_bucket(&crumbs(&["Doc", "Home"])), "Home");
        assert_eq!(page_bucket(&crumbs(&["Doc", "Home", "Card"])), "Home");
    }
}
