//! # Builder Session
//!
//! One open page in the builder: live block tree, selection, history,
//! debounce timer and clipboard. All of it is instance state; two sessions
//! never share a clipboard or a history.
//!
//! ## Snapshot flow
//!
//! ```text
//! add/remove/move/paste/update ──► schedule (deadline = now + 500ms)
//!                                      │
//!                   poll() after idle  ▼
//!                               take_snapshot() ──► History::capture
//!
//! undo/redo ──► flush pending ──► History::undo/redo ──► restore (no capture)
//! ```
//!
//! Every mutation goes through a method on this type. Editing the block list
//! behind the session's back leaves history unaware of the change.

use crate::{BuilderState, Debouncer, EditorConfig};
use pagecraft_blocks::{
    tree, BlockInstance, BlockRegistry, GlobalSettings, IdGenerator, Page, UuidGenerator,
    COLUMNS_KEY, SECTION_KEY,
};
use pagecraft_common::{Clipboard, History};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What to insert: a registry type key, or an existing block / palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BlockSource {
    Type(String),
    Instance(BlockInstance),
}

impl From<&str> for BlockSource {
    fn from(block_type: &str) -> Self {
        BlockSource::Type(block_type.to_string())
    }
}

impl From<BlockInstance> for BlockSource {
    fn from(block: BlockInstance) -> Self {
        BlockSource::Instance(block)
    }
}

/// One breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: String,

    pub label: String,
}

pub struct BuilderSession {
    state: BuilderState,
    registry: Arc<dyn BlockRegistry>,
    ids: Box<dyn IdGenerator>,
    history: History<BuilderState>,
    debouncer: Debouncer,
    clipboard: Clipboard<BlockInstance>,
}

impl BuilderSession {
    /// Empty session with default history settings and UUID ids
    pub fn new(registry: Arc<dyn BlockRegistry>) -> Self {
        Self::with_config(registry, EditorConfig::default())
    }

    pub fn with_config(registry: Arc<dyn BlockRegistry>, config: EditorConfig) -> Self {
        let state = BuilderState::default();
        Self {
            history: History::with_max_entries(state.clone(), config.max_entries),
            state,
            registry,
            ids: Box::new(UuidGenerator),
            debouncer: Debouncer::new(config.debounce()),
            clipboard: Clipboard::new(),
        }
    }

    /// Session opened on an existing page
    pub fn from_page(registry: Arc<dyn BlockRegistry>, page: Page, config: EditorConfig) -> Self {
        let mut session = Self::with_config(registry, config);
        session.load(page);
        session
    }

    /// Replace the id source (deterministic ids for tests and tooling)
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the page and start history over from it
    pub fn load(&mut self, page: Page) {
        self.state = BuilderState::from_page(page);
        self.history.reset(self.state.clone());
        self.debouncer.cancel();
        info!(blocks = self.state.blocks.len(), "Loaded page into builder");
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.state.blocks
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.state.global_settings
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.state.editing_index
    }

    pub fn active_block_id(&self) -> Option<&str> {
        self.state.active_block_id.as_deref()
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn to_page(&self) -> Page {
        self.state.to_page()
    }

    pub fn registry(&self) -> &dyn BlockRegistry {
        self.registry.as_ref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clipboard_has_content(&self) -> bool {
        self.clipboard.has_content()
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending snapshot becomes due, if one is scheduled
    pub fn snapshot_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    // ------------------------------------------------------------------
    // Instance creation
    // ------------------------------------------------------------------

    /// Fresh instance of a registered type with a copy of its defaults
    pub fn create_block_instance(&mut self, block_type: &str) -> Option<BlockInstance> {
        let Some(definition) = self.registry.get(block_type) else {
            warn!(block_type, "Unknown block type");
            return None;
        };

        Some(BlockInstance::new(self.ids.new_id(), block_type).with_settings(definition.default_settings.clone()))
    }

    /// Copy of `source` with a new root id and registry defaults filled in
    ///
    /// Existing settings win over defaults, so keys a newer definition added
    /// show up on blocks saved under an older one. Nested blocks are copied
    /// as-is, ids included. A default for a nested-block key never overrides
    /// the source's own nested blocks.
    pub fn clone_block(&mut self, source: &BlockInstance) -> BlockInstance {
        let mut settings = self
            .registry
            .get(&source.block_type)
            .map(|definition| definition.default_settings.clone())
            .unwrap_or_default();
        if source.columns.is_some() {
            settings.remove(COLUMNS_KEY);
        }
        if source.section.is_some() {
            settings.remove(SECTION_KEY);
        }
        settings.extend(source.settings.clone());

        let mut block = source.clone();
        block.id = self.ids.new_id();
        block.settings = settings;
        block.lift_nested();
        block
    }

    // ------------------------------------------------------------------
    // Root-level mutations
    // ------------------------------------------------------------------

    /// Insert at `index` (clamped) or append; returns the new block's id
    pub fn add_block(&mut self, source: impl Into<BlockSource>, index: Option<usize>) -> Option<String> {
        let block = match source.into() {
            BlockSource::Type(block_type) => self.create_block_instance(&block_type)?,
            BlockSource::Instance(block) => self.clone_block(&block),
        };
        let id = block.id.clone();

        let position = index
            .map(|i| i.min(self.state.blocks.len()))
            .unwrap_or(self.state.blocks.len());
        self.state.blocks.insert(position, block);

        debug!(block_id = %id, position, "Added block");
        self.schedule_snapshot();
        Some(id)
    }

    /// Remove the root block at `index`
    pub fn remove_block(&mut self, index: usize) -> Option<BlockInstance> {
        if index >= self.state.blocks.len() {
            return None;
        }

        let removed = self.state.blocks.remove(index);

        self.state.editing_index = match self.state.editing_index {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        self.clear_selection_within(&removed);

        debug!(block_id = %removed.id, index, "Removed block");
        self.schedule_snapshot();
        Some(removed)
    }

    /// Insert a copy right after `index`; only the copy's root id is new
    ///
    /// Nested blocks keep their ids, so the copy's subtree collides with the
    /// original's until something reassigns them. Code downstream may depend
    /// on child ids surviving a duplicate, so this is left as is.
    pub fn duplicate_block(&mut self, index: usize) -> Option<String> {
        let mut copy = self.state.blocks.get(index)?.clone();
        copy.id = self.ids.new_id();
        let id = copy.id.clone();

        if copy.has_descendants() {
            debug!(
                block_id = %id,
                nested = copy.descendant_count(),
                "Duplicated container shares nested ids with its source"
            );
        }

        self.state.blocks.insert(index + 1, copy);
        self.schedule_snapshot();
        Some(id)
    }

    pub fn move_block_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.state.blocks.len() {
            return false;
        }
        self.swap_root(index - 1, index);
        true
    }

    pub fn move_block_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.state.blocks.len() {
            return false;
        }
        self.swap_root(index, index + 1);
        true
    }

    fn swap_root(&mut self, upper: usize, lower: usize) {
        self.state.blocks.swap(upper, lower);

        // The editing index follows whichever block moved
        self.state.editing_index = match self.state.editing_index {
            Some(editing) if editing == upper => Some(lower),
            Some(editing) if editing == lower => Some(upper),
            other => other,
        };

        self.schedule_snapshot();
    }

    // ------------------------------------------------------------------
    // Nested edits
    // ------------------------------------------------------------------

    /// Remove a block at any depth
    pub fn remove_block_by_id(&mut self, id: &str) -> Option<BlockInstance> {
        if let Some(index) = self.state.blocks.iter().position(|block| block.id == id) {
            return self.remove_block(index);
        }

        let removed = tree::remove_block(&mut self.state.blocks, id)?;
        self.clear_selection_within(&removed);
        debug!(block_id = %id, "Removed nested block");
        self.schedule_snapshot();
        Some(removed)
    }

    /// The list holding `id` and its position, for callers editing nested
    /// collections directly
    ///
    /// Changes made through the returned list are only recorded once
    /// [`take_snapshot`](Self::take_snapshot) or
    /// [`touch`](Self::touch) is called.
    pub fn find_parent_list_mut(&mut self, id: &str) -> Option<(&mut Vec<BlockInstance>, usize)> {
        tree::find_parent_list_mut(&mut self.state.blocks, id)
    }

    /// Mark the tree as edited after a direct change
    pub fn touch(&mut self) {
        self.schedule_snapshot();
    }

    /// Set one setting on a block; nested-block keys are managed structurally
    pub fn update_block_settings(&mut self, id: &str, key: &str, value: Value) -> bool {
        if key == COLUMNS_KEY || key == SECTION_KEY {
            warn!(block_id = %id, key, "Nested block collections cannot be set as settings");
            return false;
        }

        let Some(block) = tree::find_block_mut(&mut self.state.blocks, id) else {
            return false;
        };
        if block.settings.get(key) == Some(&value) {
            return false;
        }
        block.settings.insert(key.to_string(), value);

        self.schedule_snapshot();
        true
    }

    pub fn set_global_setting(&mut self, key: &str, value: Value) -> bool {
        if self.state.global_settings.get(key) == Some(&value) {
            return false;
        }
        self.state.global_settings.insert(key.to_string(), value);
        self.schedule_snapshot();
        true
    }

    // ------------------------------------------------------------------
    // Selection & paths
    // ------------------------------------------------------------------

    pub fn find_block_by_id(&self, id: &str) -> Option<&BlockInstance> {
        tree::find_block(&self.state.blocks, id)
    }

    /// Search an arbitrary forest with the same traversal
    pub fn find_block_by_id_in<'a>(items: &'a [BlockInstance], id: &str) -> Option<&'a BlockInstance> {
        tree::find_block(items, id)
    }

    /// Breadcrumb from the root block down to `id`; empty if not found
    pub fn get_block_path(&self, id: &str) -> Vec<PathSegment> {
        tree::block_path(&self.state.blocks, id)
            .unwrap_or_default()
            .into_iter()
            .map(|block| PathSegment {
                id: block.id.clone(),
                block_type: block.block_type.clone(),
                label: self.registry.label_for(&block.block_type),
            })
            .collect()
    }

    /// Select a block; root blocks also become the editing index
    pub fn select_block(&mut self, id: &str) -> bool {
        if self.find_block_by_id(id).is_none() {
            return false;
        }

        self.state.active_block_id = Some(id.to_string());
        self.state.editing_index = self.state.blocks.iter().position(|block| block.id == id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.state.active_block_id = None;
        self.state.editing_index = None;
    }

    fn clear_selection_within(&mut self, removed: &BlockInstance) {
        if let Some(active) = &self.state.active_block_id {
            if tree::find_block(std::slice::from_ref(removed), active).is_some() {
                self.state.active_block_id = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Put a copy of `id` on the clipboard
    pub fn copy_block(&mut self, id: &str) -> bool {
        let Some(block) = self.find_block_by_id(id).cloned() else {
            return false;
        };
        self.clipboard.copy(block);
        true
    }

    /// Copy `id` to the clipboard and remove it from the tree
    pub fn cut_block(&mut self, id: &str) -> Option<BlockInstance> {
        let block = self.find_block_by_id(id)?.clone();
        self.clipboard.copy(block);
        self.remove_block_by_id(id)
    }

    /// Insert the clipboard content with a new root id; returns that id
    ///
    /// The clipboard keeps its content, so repeated pastes each get their own
    /// root id. Nested ids are copied unchanged, as with
    /// [`duplicate_block`](Self::duplicate_block).
    pub fn paste_block(&mut self, index: Option<usize>) -> Option<String> {
        let mut block = self.clipboard.peek()?.item.clone();
        block.id = self.ids.new_id();
        let id = block.id.clone();

        let position = index
            .map(|i| i.min(self.state.blocks.len()))
            .unwrap_or(self.state.blocks.len());
        self.state.blocks.insert(position, block);

        debug!(block_id = %id, position, "Pasted block");
        self.schedule_snapshot();
        Some(id)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn schedule_snapshot(&mut self) {
        self.debouncer.schedule(Instant::now());
    }

    /// Capture live state now; returns false if nothing changed
    pub fn take_snapshot(&mut self) -> bool {
        self.debouncer.cancel();

        let captured = self.history.capture(self.state.clone());
        if captured {
            debug!(index = self.history.index(), len = self.history.len(), "Captured snapshot");
        }
        captured
    }

    /// Capture if the idle window has elapsed
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.debouncer.is_due(now) {
            self.take_snapshot()
        } else {
            false
        }
    }

    /// Capture a pending edit without waiting for the idle window
    pub fn flush(&mut self) -> bool {
        if self.debouncer.is_pending() {
            self.take_snapshot()
        } else {
            false
        }
    }

    pub fn undo(&mut self) -> bool {
        self.flush();

        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        debug!(index = self.history.index(), "Undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        self.flush();

        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        debug!(index = self.history.index(), "Redo");
        true
    }

    /// Put a snapshot back into live state without scheduling a capture
    fn restore(&mut self, snapshot: BuilderState) {
        self.state = snapshot;
        self.debouncer.cancel();
    }
}
