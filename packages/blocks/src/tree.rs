//! Lookups over a block forest
//!
//! All functions walk nested blocks depth-first through
//! [`BlockInstance::child_lists`], so the three nesting forms behave alike.

use crate::BlockInstance;
use std::collections::HashSet;

/// Find a block anywhere in the forest
pub fn find_block<'a>(items: &'a [BlockInstance], id: &str) -> Option<&'a BlockInstance> {
    for block in items {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists() {
            if let Some(found) = find_block(list, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable counterpart of [`find_block`]
pub fn find_block_mut<'a>(items: &'a mut [BlockInstance], id: &str) -> Option<&'a mut BlockInstance> {
    for block in items.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists_mut() {
            if let Some(found) = find_block_mut(list, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Chain of blocks from a root down to `id` (inclusive)
pub fn block_path<'a>(items: &'a [BlockInstance], id: &str) -> Option<Vec<&'a BlockInstance>> {
    for block in items {
        if block.id == id {
            return Some(vec![block]);
        }
        for list in block.child_lists() {
            if let Some(mut path) = block_path(list, id) {
                path.insert(0, block);
                return Some(path);
            }
        }
    }
    None
}

/// The list that directly holds `id`, with the block's position in it
pub fn find_parent_list_mut<'a>(
    items: &'a mut Vec<BlockInstance>,
    id: &str,
) -> Option<(&'a mut Vec<BlockInstance>, usize)> {
    if let Some(pos) = items.iter().position(|block| block.id == id) {
        return Some((items, pos));
    }

    for block in items.iter_mut() {
        for list in block.child_lists_mut() {
            if let Some(found) = find_parent_list_mut(list, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Remove a block wherever it is nested and return it
pub fn remove_block(items: &mut Vec<BlockInstance>, id: &str) -> Option<BlockInstance> {
    let (list, pos) = find_parent_list_mut(items, id)?;
    Some(list.remove(pos))
}

/// Every id in the forest, in depth-first order
pub fn collect_ids(items: &[BlockInstance]) -> Vec<&str> {
    let mut ids = Vec::new();
    collect_into(items, &mut ids);
    ids
}

fn collect_into<'a>(items: &'a [BlockInstance], ids: &mut Vec<&'a str>) {
    for block in items {
        ids.push(block.id.as_str());
        for list in block.child_lists() {
            collect_into(list, ids);
        }
    }
}

/// Ids that appear more than once (each reported once, first-seen order)
///
/// Duplicating or pasting a container only renames its root, so nested ids
/// collide with the source subtree; this is how callers detect that.
pub fn duplicate_ids(items: &[BlockInstance]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for id in collect_ids(items) {
        if !seen.insert(id) && reported.insert(id) {
            duplicates.push(id.to_string());
        }
    }
    duplicates
}
