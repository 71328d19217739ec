//! Pre-order traversal of a node tree with ancestor-name breadcrumbs.

use crate::node::Node;

/// Iterator over `(node, breadcrumbs)` in pre-order, siblings in document order.
///
/// Breadcrumbs start with the root name (or `"Document"`) and end with the
/// yielded node's own crumb.
pub struct Walk<'a> {
    stack: Vec<(&'a Node, Vec<String>)>,
}

pub fn walk(root: &Node) -> Walk<'_> {
    let root_crumb = root.name.clone().unwrap_or_else(|| "Document".to_string());
    Walk {
        stack: vec![(root, vec![root_crumb])],
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Node, Vec<String>);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, crumbs) = self.stack.pop()?;
        // Reversed so the leftmost child is popped first.
        for child in node.children().iter().rev() {
            let mut child_crumbs = crumbs.clone();
            child_crumbs.push(child.crumb().to_string());
            self.stack.push((child, child_crumbs));
        }
        Some((node, crumbs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Node {
        serde_json::from_value(json!({
            "id": "0:0", "name": "Doc", "type": "DOCUMENT",
            "children": [
                {"id": "1:0", "name": "Home", "type": "CANVAS", "children": [
                    {"id": "1:1", "name": "A", "type": "FRAME", "children": [
                        {"id": "1:2", "type": "TEXT"}
                    ]},
                    {"id": "1:3", "name": "B", "type": "FRAME"}
                ]},
                {"id": "2:0", "name": "Settings", "type": "CANVAS", "children": [
                    {"id": "2:1"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn visits_every_node_once_in_pre_order() {
        let root = tree();
        let ids: Vec<_> = walk(&root)
            .map(|(n, _)| n.id.clone().unwrap())
            .collect();
        assert_eq!(ids, ["0:0", "1:0", "1:1", "1:2", "1:3", "2:0", "2:1"]);
    }

    #[test]
    fn breadcrumbs_fall_back_to_type_then_node() {
        let root = tree();
        let crumbs: Vec<_> = walk(&root).map(|(_, c)| c.join("/")).collect();
        assert_eq!(crumbs[0], "Doc");
        assert_eq!(crumbs[3], "Doc/Home/A/TEXT");
        assert_eq!(crumbs[6], "Doc/Settings/Node");
    }

    #[test]
    fn unnamed_root_is_document() {
        let root = Node::default();
        let all: Vec<_> = walk(&root).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1, vec!["Document".to_string()]);
    }
}
