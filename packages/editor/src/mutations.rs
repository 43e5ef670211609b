//! # Builder Mutations
//!
//! Serializable form of the session's edit operations, so drag-drop
//! handlers, context menus and keyboard shortcuts can all dispatch through
//! one entry point (and so commands can be logged or replayed).
//!
//! Lookup failures are not errors: an unknown block type or a stale id turns
//! the mutation into a no-op and `MutationResult::changed` is false.

use crate::{BlockSource, BuilderSession};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a new block from a type key or an existing block
    AddBlock {
        source: BlockSource,
        index: Option<usize>,
    },

    RemoveBlock {
        index: usize,
    },

    /// Remove a block at any depth
    RemoveBlockById {
        block_id: String,
    },

    DuplicateBlock {
        index: usize,
    },

    MoveBlockUp {
        index: usize,
    },

    MoveBlockDown {
        index: usize,
    },

    UpdateSetting {
        block_id: String,
        key: String,
        value: Value,
    },

    SetGlobalSetting {
        key: String,
        value: Value,
    },

    SelectBlock {
        block_id: String,
    },

    CopyBlock {
        block_id: String,
    },

    CutBlock {
        block_id: String,
    },

    PasteBlock {
        index: Option<usize>,
    },

    Undo,

    Redo,
}

/// Outcome of applying a mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationResult {
    /// False when the mutation turned out to be a no-op
    pub changed: bool,

    /// Id of the block created by add/duplicate/paste
    pub block_id: Option<String>,
}

impl MutationResult {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            block_id: None,
        }
    }

    fn created(block_id: Option<String>) -> Self {
        Self {
            changed: block_id.is_some(),
            block_id,
        }
    }
}

impl Mutation {
    /// Apply to a session
    pub fn apply(self, session: &mut BuilderSession) -> MutationResult {
        match self {
            Mutation::AddBlock { source, index } => MutationResult::created(session.add_block(source, index)),

            Mutation::RemoveBlock { index } => MutationResult::changed(session.remove_block(index).is_some()),

            Mutation::RemoveBlockById { block_id } => {
                MutationResult::changed(session.remove_block_by_id(&block_id).is_some())
            }

            Mutation::DuplicateBlock { index } => MutationResult::created(session.duplicate_block(index)),

            Mutation::MoveBlockUp { index } => MutationResult::changed(session.move_block_up(index)),

            Mutation::MoveBlockDown { index } => MutationResult::changed(session.move_block_down(index)),

            Mutation::UpdateSetting { block_id, key, value } => {
                MutationResult::changed(session.update_block_settings(&block_id, &key, value))
            }

            Mutation::SetGlobalSetting { key, value } => {
                MutationResult::changed(session.set_global_setting(&key, value))
            }

            Mutation::SelectBlock { block_id } => MutationResult::changed(session.select_block(&block_id)),

            Mutation::CopyBlock { block_id } => MutationResult::changed(session.copy_block(&block_id)),

            Mutation::CutBlock { block_id } => MutationResult::changed(session.cut_block(&block_id).is_some()),

            Mutation::PasteBlock { index } => MutationResult::created(session.paste_block(index)),

            Mutation::Undo => MutationResult::changed(session.undo()),

            Mutation::Redo => MutationResult::changed(session.redo()),
        }
    }
}

impl BuilderSession {
    /// Apply a serialized mutation
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        mutation.apply(self)
    }
}
