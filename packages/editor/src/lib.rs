//! # Pagecraft Editor
//!
//! Page-builder editing engine: structural edits on the block tree,
//! selection and breadcrumbs, clipboard, and snapshot-based undo/redo.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: BlockInstance tree + registry       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: BuilderSession                      │
//! │  - add/remove/duplicate/move/paste          │
//! │  - find by id, breadcrumb paths             │
//! │  - debounced snapshots, undo/redo           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ resolver: dynamic tags → preview/render     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{BuilderSession, Mutation};
//!
//! let mut session = BuilderSession::new(registry);
//! let id = session.add_block("text", None).unwrap();
//! session.update_block_settings(&id, "text", "Welcome".into());
//!
//! // From the UI loop
//! session.poll();
//!
//! session.undo();
//! ```

mod config;
mod debounce;
mod document;
mod errors;
mod mutations;
mod session;
mod state;

pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use document::PageDocument;
pub use errors::EditorError;
pub use mutations::{Mutation, MutationResult};
pub use session::{BlockSource, BuilderSession, PathSegment};
pub use state::BuilderState;

// Re-export common types for convenience
pub use pagecraft_blocks::{BlockInstance, Page};
