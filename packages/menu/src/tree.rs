//! # Flat ↔ Nested Conversion
//!
//! ```text
//! flat (server)                         nested (editor)
//! ┌──────────────────────────────┐      ┌──────────────┐
//! │ id=1 parent=∅ order=0        │      │ Home         │
//! │ id=2 parent=∅ order=1        │ ───▶ │ About        │
//! │ id=3 parent=2 order=0        │ ◀─── │   └─ Team    │
//! └──────────────────────────────┘      └──────────────┘
//!        build_tree / flatten_tree
//! ```
//!
//! Also holds the lookups the editor uses on the nested form.

use crate::item::{MenuItem, MenuItemKey};
use serde::{Deserialize, Serialize};

/// One row of `POST /menus/:id/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub sort_order: i64,
}

/// Nest the items whose `parent_id` equals `parent_id`, ordered by
/// `sort_order` (ties keep input order)
pub fn build_tree(flat: &[MenuItem], parent_id: Option<i64>) -> Vec<MenuItem> {
    let mut level: Vec<MenuItem> = flat
        .iter()
        .filter(|item| item.parent_id == parent_id)
        .map(|item| {
            let mut node = item.without_children();
            // An unsaved item cannot be anyone's parent in flat form
            if let Some(id) = item.id {
                node.children = build_tree(flat, Some(id));
            }
            node
        })
        .collect();

    level.sort_by_key(|item| item.sort_order);
    level
}

/// Depth-first flattening; each node gets its computed `parent_id` and its
/// index among siblings as `sort_order`
pub fn flatten_tree(tree: &[MenuItem], parent_id: Option<i64>) -> Vec<MenuItem> {
    let mut flat = Vec::new();
    flatten_into(tree, parent_id, &mut flat);
    flat
}

fn flatten_into(tree: &[MenuItem], parent_id: Option<i64>, flat: &mut Vec<MenuItem>) {
    for (index, item) in tree.iter().enumerate() {
        let mut node = item.without_children();
        node.parent_id = parent_id;
        node.sort_order = index as i64;
        flat.push(node);
        flatten_into(&item.children, item.id, flat);
    }
}

/// Reorder rows for every saved item in the tree
pub fn reorder_payload(tree: &[MenuItem]) -> Vec<ReorderEntry> {
    flatten_tree(tree, None)
        .into_iter()
        .filter_map(|item| {
            item.id.map(|id| ReorderEntry {
                id,
                parent_id: item.parent_id,
                sort_order: item.sort_order,
            })
        })
        .collect()
}

pub fn find_item<'a>(items: &'a [MenuItem], key: &MenuItemKey) -> Option<&'a MenuItem> {
    for item in items {
        if item.matches(key) {
            return Some(item);
        }
        if let Some(found) = find_item(&item.children, key) {
            return Some(found);
        }
    }
    None
}

pub fn find_item_mut<'a>(items: &'a mut [MenuItem], key: &MenuItemKey) -> Option<&'a mut MenuItem> {
    for item in items {
        if item.matches(key) {
            return Some(item);
        }
        if let Some(found) = find_item_mut(&mut item.children, key) {
            return Some(found);
        }
    }
    None
}

/// Sibling list under `parent` (`None` = top level)
pub fn children_mut<'a>(items: &'a mut Vec<MenuItem>, parent: Option<&MenuItemKey>) -> Option<&'a mut Vec<MenuItem>> {
    match parent {
        None => Some(items),
        Some(key) => find_item_mut(items, key).map(|item| &mut item.children),
    }
}

/// Detach an item (and its subtree) from anywhere in the tree
pub fn remove_item(items: &mut Vec<MenuItem>, key: &MenuItemKey) -> Option<MenuItem> {
    if let Some(index) = items.iter().position(|item| item.matches(key)) {
        return Some(items.remove(index));
    }
    items.iter_mut().find_map(|item| remove_item(&mut item.children, key))
}

/// Saved items of `before` that appear nowhere in `after`
///
/// A removed item's descendants are not listed; they go with it.
pub fn removed_ids(before: &[MenuItem], after: &[MenuItem]) -> Vec<i64> {
    let mut removed = Vec::new();
    collect_removed(before, after, &mut removed);
    removed
}

fn collect_removed(before: &[MenuItem], after: &[MenuItem], removed: &mut Vec<i64>) {
    for item in before {
        match item.id {
            Some(id) if find_item(after, &MenuItemKey::Id(id)).is_none() => removed.push(id),
            _ => collect_removed(&item.children, after, removed),
        }
    }
}

/// Preorder index paths to every node
pub fn preorder_paths(items: &[MenuItem]) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    collect_paths(items, &mut Vec::new(), &mut paths);
    paths
}

fn collect_paths(items: &[MenuItem], prefix: &mut Vec<usize>, paths: &mut Vec<Vec<usize>>) {
    for (index, item) in items.iter().enumerate() {
        prefix.push(index);
        paths.push(prefix.clone());
        collect_paths(&item.children, prefix, paths);
        prefix.pop();
    }
}

pub fn item_at<'a>(items: &'a [MenuItem], path: &[usize]) -> Option<&'a MenuItem> {
    let (first, rest) = path.split_first()?;
    let item = items.get(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        item_at(&item.children, rest)
    }
}

pub fn item_at_mut<'a>(items: &'a mut [MenuItem], path: &[usize]) -> Option<&'a mut MenuItem> {
    let (first, rest) = path.split_first()?;
    let item = items.get_mut(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        item_at_mut(&mut item.children, rest)
    }
}
