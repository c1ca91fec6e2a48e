//! Active path marking.
//!
//! An item is active when its link equals the current path, when its
//! active-route pattern matches the current path, or when any descendant
//! is active.

use std::collections::HashSet;

use super::item::MenuItem;

/// Whether the item itself (ignoring children) matches the path.
fn matches_own(item: &MenuItem, current_path: &str) -> bool {
    item.link() == Some(current_path)
        || item
            .active_route()
            .is_some_and(|route| route.matches(current_path))
}

/// Recompute `active` flags for a subtree and return the receiver's flag.
///
/// Every node is visited, so flags left over from a previous path are
/// always cleared.
pub fn set_active_recursively(current_path: &str, item: &mut MenuItem) -> bool {
    let mut subtree_active = false;
    for child in item.items_mut() {
        // No short-circuit: every sibling must be reset.
        if set_active_recursively(current_path, child) {
            subtree_active = true;
        }
    }

    let active = subtree_active || matches_own(item, current_path);
    item.set_active(active);
    active
}

/// Names of the items that would be active for `current_path`.
///
/// Leaves the tree untouched; a renderer can consult the set instead of
/// the per-item flags.
pub fn active_set(current_path: &str, item: &MenuItem) -> HashSet<String> {
    let mut names = HashSet::new();
    collect_active(current_path, item, &mut names);
    names
}

fn collect_active(current_path: &str, item: &MenuItem, names: &mut HashSet<String>) -> bool {
    let mut subtree_active = false;
    for child in item.items() {
        if collect_active(current_path, child, names) {
            subtree_active = true;
        }
    }

    let active = subtree_active || matches_own(item, current_path);
    if active {
        names.insert(item.name().to_string());
    }
    active
}
