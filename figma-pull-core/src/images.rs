//! Harvests ids of nodes whose paints reference bitmap images.

use std::collections::BTreeSet;

use crate::node::{Node, Paint};

/// Returns the ids of all nodes in `node`'s subtree (inclusive) that carry an
/// `IMAGE` paint in `fills` or `background`.
///
/// Every child is scanned regardless of its type; nodes without an id only
/// contribute their descendants.
pub fn collect_image_ids(node: &Node) -> BTreeSet<String> {
    let mut ids: BTreeSet<String> = node
        .children()
        .iter()
        .flat_map(collect_image_ids)
        .collect();
    if has_image(node.fills()) || has_image(node.background()) {
        if let Some(id) = &node.id {
            ids.insert(id.clone());
        }
    }
    ids
}

fn has_image(paints: &[Paint]) -> bool {
    paints.iter().any(Paint::is_image)
}
