//! # Pagecraft Menu
//!
//! Navigation menu editing: flat/nested conversion, a history-backed
//! editor with clipboard, and the HTTP client used to persist menus.

pub mod api;
pub mod editor;
pub mod error;
pub mod item;
pub mod tree;

pub use api::{HttpMenuApi, MenuApi};
pub use editor::MenuEditor;
pub use error::{MenuError, MenuResult};
pub use item::{Menu, MenuItem, MenuItemKey, MenuUpdate};
pub use tree::{build_tree, flatten_tree, reorder_payload, ReorderEntry};
