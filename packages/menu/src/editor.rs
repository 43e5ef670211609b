//! # Menu Editor
//!
//! Nested editing over a menu that the server stores flat. Structural edits
//! apply to the `items` tree and are captured in history right away.
//!
//! ## Saving
//!
//! ```text
//! phase 1: POST every unsaved item, parents before children
//!          (a child is created under its parent's new id)
//! phase 2: flatten → POST /menus/:id/reorder
//! phase 3: DELETE every saved item removed since the last fetch/save
//! ```
//!
//! Deletes run after the reorder so an item moved out of a removed parent is
//! re-parented before the parent goes.
//!
//! Requests are awaited one at a time. The first failure stops the save,
//! is stored in `error` and returned. Items created before the failure keep
//! their new ids in live state and in every history entry, so neither a
//! retry nor an undo followed by a save creates them twice.

use crate::api::MenuApi;
use crate::error::{MenuError, MenuResult};
use crate::item::{Menu, MenuItem, MenuItemKey, MenuUpdate};
use crate::tree;
use pagecraft_blocks::{IdGenerator, UuidGenerator};
use pagecraft_common::{ClipboardAction, Clipboard, History};
use tracing::{debug, error, info, instrument};

/// An item created during a save, by the temp id it had before
struct CreatedItem {
    temp: String,
    id: i64,
    parent_id: Option<i64>,
}

pub struct MenuEditor {
    menu_id: i64,
    menu: Option<Menu>,
    items: Vec<MenuItem>,

    /// Items as of the last successful fetch/save
    clean: Vec<MenuItem>,

    history: History<Vec<MenuItem>>,
    clipboard: Clipboard<MenuItem>,
    ids: Box<dyn IdGenerator>,

    /// Message from the last failed request
    error: Option<String>,
}

impl MenuEditor {
    pub fn new(menu_id: i64) -> Self {
        Self {
            menu_id,
            menu: None,
            items: Vec::new(),
            clean: Vec::new(),
            history: History::new(Vec::new()),
            clipboard: Clipboard::new(),
            ids: Box::new(UuidGenerator),
            error: None,
        }
    }

    /// Editor over items already in nested form
    pub fn with_items(menu_id: i64, items: Vec<MenuItem>) -> Self {
        let mut editor = Self::new(menu_id);
        editor.replace_all(items);
        editor
    }

    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn menu_id(&self) -> i64 {
        self.menu_id
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find_item(&self, key: &MenuItemKey) -> Option<&MenuItem> {
        tree::find_item(&self.items, key)
    }

    pub fn is_dirty(&self) -> bool {
        self.items != self.clean
    }

    pub fn mark_clean(&mut self) {
        self.clean = self.items.clone();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.has_content()
    }

    /// New baseline: clean, with a fresh history
    fn replace_all(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.mark_clean();
        self.history.reset(self.items.clone());
    }

    fn capture(&mut self) {
        self.history.capture(self.items.clone());
    }

    /// Give every keyless node in the subtree a temp id
    fn assign_temp_ids(&mut self, item: &mut MenuItem) {
        if item.key().is_none() {
            item.temp_id = Some(self.ids.new_id());
        }
        for child in &mut item.children {
            self.assign_temp_ids(child);
        }
    }

    /// Turn a subtree into brand-new unsaved items
    fn detach_ids(&mut self, item: &mut MenuItem) {
        item.id = None;
        item.parent_id = None;
        item.temp_id = Some(self.ids.new_id());
        for child in &mut item.children {
            self.detach_ids(child);
        }
    }

    fn insert(&mut self, parent: Option<&MenuItemKey>, item: MenuItem, index: Option<usize>) -> Option<MenuItemKey> {
        let key = item.key()?;
        let siblings = tree::children_mut(&mut self.items, parent)?;
        let at = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, item);
        self.capture();
        Some(key)
    }

    /// Insert a new item under `parent` (`None` = top level)
    ///
    /// Returns the item's key, or `None` if the parent does not exist.
    pub fn add_item(&mut self, parent: Option<&MenuItemKey>, mut item: MenuItem, index: Option<usize>) -> Option<MenuItemKey> {
        if let Some(parent) = parent {
            self.find_item(parent)?;
        }
        self.assign_temp_ids(&mut item);
        debug!(title = %item.title, "add menu item");
        self.insert(parent, item, index)
    }

    /// Remove an item and its subtree locally
    ///
    /// Saved items removed this way are deleted on the server by the next
    /// [`save`](Self::save).
    pub fn remove_item(&mut self, key: &MenuItemKey) -> Option<MenuItem> {
        let removed = tree::remove_item(&mut self.items, key)?;
        self.capture();
        Some(removed)
    }

    pub fn update_item(&mut self, key: &MenuItemKey, update: impl FnOnce(&mut MenuItem)) -> bool {
        let Some(item) = tree::find_item_mut(&mut self.items, key) else {
            return false;
        };
        update(item);
        self.capture();
        true
    }

    /// Move an item under a new parent at `index`
    ///
    /// Fails when either key is unknown or the target is inside the moved
    /// subtree.
    pub fn move_item(&mut self, key: &MenuItemKey, new_parent: Option<&MenuItemKey>, index: usize) -> bool {
        let Some(item) = self.find_item(key) else {
            return false;
        };
        if let Some(parent) = new_parent {
            if parent == key || tree::find_item(&item.children, parent).is_some() || self.find_item(parent).is_none() {
                return false;
            }
        }

        let Some(item) = tree::remove_item(&mut self.items, key) else {
            return false;
        };
        let Some(siblings) = tree::children_mut(&mut self.items, new_parent) else {
            return false;
        };
        let at = index.min(siblings.len());
        siblings.insert(at, item);
        self.capture();
        true
    }

    pub fn copy_item(&mut self, key: &MenuItemKey) -> bool {
        let Some(item) = self.find_item(key).cloned() else {
            return false;
        };
        self.clipboard.copy(item);
        true
    }

    pub fn cut_item(&mut self, key: &MenuItemKey) -> Option<MenuItem> {
        let item = self.remove_item(key)?;
        self.clipboard.cut(item.clone());
        Some(item)
    }

    /// Paste at the end of `parent`'s children
    ///
    /// A copied item is pasted as new unsaved items (every node gets a temp
    /// id). A cut item is moved back in with its ids, and the clipboard is
    /// emptied.
    pub fn paste_item(&mut self, parent: Option<&MenuItemKey>) -> Option<MenuItemKey> {
        if let Some(parent) = parent {
            self.find_item(parent)?;
        }

        let item = match self.clipboard.action()? {
            ClipboardAction::Copy => {
                let mut item = self.clipboard.peek()?.item.clone();
                self.detach_ids(&mut item);
                item
            }
            ClipboardAction::Cut => self.clipboard.take()?.item,
        };
        self.insert(parent, item, None)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(items) => {
                self.items = items.clone();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(items) => {
                self.items = items.clone();
                true
            }
            None => false,
        }
    }

    fn record<T>(&mut self, result: MenuResult<T>) -> MenuResult<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(err) => {
                error!(menu_id = self.menu_id, error = %err, "menu request failed");
                self.error = Some(err.to_string());
            }
        }
        result
    }

    /// Load the menu and its items, replacing local state
    #[instrument(skip(self, api), fields(menu_id = self.menu_id))]
    pub async fn fetch(&mut self, api: &dyn MenuApi) -> MenuResult<()> {
        let menu_id = self.menu_id;
        let result = async {
            let menu = api.get_menu(menu_id).await?;
            let flat = api.get_items(menu_id).await?;
            Ok((menu, flat))
        }
        .await;

        let (menu, flat) = self.record(result)?;
        info!(items = flat.len(), "fetched menu");
        self.menu = Some(menu);
        self.replace_all(tree::build_tree(&flat, None));
        Ok(())
    }

    /// Create unsaved items, persist the whole order, then delete removed items
    #[instrument(skip(self, api), fields(menu_id = self.menu_id))]
    pub async fn save(&mut self, api: &dyn MenuApi) -> MenuResult<()> {
        let mut created = Vec::new();
        let result = self.save_items(api, &mut created).await;
        if result.is_err() && !created.is_empty() {
            self.adopt_ids(&created);
        }
        self.record(result)?;

        // Temp ids are gone; earlier snapshots would recreate saved items
        let items = std::mem::take(&mut self.items);
        self.replace_all(items);
        info!("saved menu");
        Ok(())
    }

    async fn save_items(&mut self, api: &dyn MenuApi, created: &mut Vec<CreatedItem>) -> MenuResult<()> {
        for path in tree::preorder_paths(&self.items) {
            let (parent_path, _) = path.split_at(path.len() - 1);
            let parent_id = tree::item_at(&self.items, parent_path).and_then(|parent| parent.id);
            let sort_order = path[path.len() - 1] as i64;

            let Some(item) = tree::item_at(&self.items, &path).filter(|item| item.is_new()) else {
                continue;
            };
            let temp = item.temp_id.clone().unwrap_or_default();
            let payload = item.create_payload(parent_id, sort_order);

            let saved = api.create_item(self.menu_id, &payload).await?;
            let id = saved.id.ok_or_else(|| MenuError::MissingId(temp.clone()))?;

            if let Some(item) = tree::item_at_mut(&mut self.items, &path) {
                item.id = Some(id);
                item.temp_id = None;
                item.parent_id = parent_id;
            }
            created.push(CreatedItem { temp, id, parent_id });
        }
        debug!(created = created.len(), "created new items");

        let entries = tree::reorder_payload(&self.items);
        api.reorder(self.menu_id, &entries).await?;
        debug!(entries = entries.len(), "reordered items");

        let removed = tree::removed_ids(&self.clean, &self.items);
        for id in &removed {
            api.delete_item(self.menu_id, *id).await?;
            // A retry must not delete it again
            tree::remove_item(&mut self.clean, &MenuItemKey::Id(*id));
        }
        debug!(deleted = removed.len(), "deleted removed items");
        Ok(())
    }

    /// Write ids assigned by a partial save into history and the clean copy
    fn adopt_ids(&mut self, created: &[CreatedItem]) {
        let adopt = |items: &mut Vec<MenuItem>| {
            for entry in created {
                if let Some(item) = tree::find_item_mut(items, &MenuItemKey::Temp(entry.temp.clone())) {
                    item.id = Some(entry.id);
                    item.temp_id = None;
                    item.parent_id = entry.parent_id;
                }
            }
        };
        self.history.update_entries(adopt);
        adopt(&mut self.clean);
        debug!(adopted = created.len(), "kept ids from partial save");
    }

    /// Delete on the server (if saved), then remove locally
    #[instrument(skip(self, api), fields(menu_id = self.menu_id))]
    pub async fn delete_item(&mut self, api: &dyn MenuApi, key: &MenuItemKey) -> MenuResult<bool> {
        let Some(item) = self.find_item(key) else {
            return Ok(false);
        };

        if let Some(id) = item.id {
            let result = api.delete_item(self.menu_id, id).await;
            self.record(result)?;
        }

        let removed = self.remove_item(key).is_some();
        // Keep the server-side deletion out of the dirty comparison
        if let Some(removed_from_clean) = tree::remove_item(&mut self.clean, key) {
            debug!(title = %removed_from_clean.title, "deleted menu item");
        }
        Ok(removed)
    }

    /// Rename or relocate the menu itself
    #[instrument(skip(self, api, update), fields(menu_id = self.menu_id))]
    pub async fn update_menu(&mut self, api: &dyn MenuApi, update: &MenuUpdate) -> MenuResult<()> {
        let result = api.update_menu(self.menu_id, update).await;
        self.menu = Some(self.record(result)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::SequentialIds;

    fn editor() -> MenuEditor {
        MenuEditor::with_items(
            1,
            vec![
                MenuItem::new("Home", "/").with_id(1),
                MenuItem::new("About", "/about")
                    .with_id(2)
                    .with_children(vec![MenuItem::new("Team", "/team").with_id(3).with_parent(2, 0)]),
            ],
        )
        .with_id_generator(Box::new(SequentialIds::new("tmp")))
    }

    fn titles(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|item| item.title.as_str()).collect()
    }

    #[test]
    fn test_add_assigns_temp_ids_recursively() {
        let mut editor = editor();
        let key = editor
            .add_item(
                Some(&MenuItemKey::Id(2)),
                MenuItem::new("Docs", "/docs").with_children(vec![MenuItem::new("API", "/api")]),
                Some(0),
            )
            .unwrap();

        assert_eq!(key, MenuItemKey::Temp("tmp-1".into()));
        let about = editor.find_item(&MenuItemKey::Id(2)).unwrap();
        assert_eq!(titles(&about.children), vec!["Docs", "Team"]);
        assert_eq!(about.children[0].children[0].temp_id.as_deref(), Some("tmp-2"));
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_add_under_missing_parent_is_noop() {
        let mut editor = editor();
        assert!(editor.add_item(Some(&MenuItemKey::Id(99)), MenuItem::new("X", "#"), None).is_none());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_move_rejects_own_subtree() {
        let mut editor = editor();
        assert!(!editor.move_item(&MenuItemKey::Id(2), Some(&MenuItemKey::Id(3)), 0));
        assert!(!editor.move_item(&MenuItemKey::Id(2), Some(&MenuItemKey::Id(2)), 0));

        assert!(editor.move_item(&MenuItemKey::Id(3), None, 0));
        assert_eq!(titles(editor.items()), vec!["Team", "Home", "About"]);
    }

    #[test]
    fn test_copy_paste_creates_new_items() {
        let mut editor = editor();
        assert!(editor.copy_item(&MenuItemKey::Id(2)));

        let key = editor.paste_item(None).unwrap();
        let pasted = editor.find_item(&key).unwrap();
        assert!(pasted.id.is_none());
        assert!(pasted.children[0].id.is_none());
        assert!(pasted.children[0].temp_id.is_some());

        // Still on the clipboard
        assert!(editor.paste_item(Some(&MenuItemKey::Id(1))).is_some());
        assert!(editor.has_clipboard());
    }

    #[test]
    fn test_cut_paste_moves_with_ids() {
        let mut editor = editor();
        editor.cut_item(&MenuItemKey::Id(3)).unwrap();
        assert!(editor.find_item(&MenuItemKey::Id(3)).is_none());

        let key = editor.paste_item(Some(&MenuItemKey::Id(1))).unwrap();
        assert_eq!(key, MenuItemKey::Id(3));
        assert_eq!(editor.items()[0].children[0].title, "Team");
        assert!(!editor.has_clipboard());
        assert!(editor.paste_item(None).is_none());
    }

    #[test]
    fn test_undo_redo_and_dirty() {
        let mut editor = editor();
        assert!(!editor.is_dirty());

        editor.update_item(&MenuItemKey::Id(1), |item| item.title = "Start".into());
        editor.remove_item(&MenuItemKey::Id(2));
        assert!(editor.is_dirty());

        assert!(editor.undo());
        assert!(editor.undo());
        assert!(!editor.undo());
        assert!(!editor.is_dirty());

        assert!(editor.redo());
        assert_eq!(editor.items()[0].title, "Start");
        assert_eq!(editor.items().len(), 2);
    }
}
