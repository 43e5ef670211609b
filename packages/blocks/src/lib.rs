//! # Pagecraft Blocks
//!
//! Data model for the page builder: the recursive [`BlockInstance`] tree,
//! the block-type registry, id generation and depth-first lookups.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_blocks::{Page, tree};
//!
//! let page = Page::from_json(&std::fs::read_to_string("home.json")?)?;
//! if let Some(path) = tree::block_path(&page.blocks, "cta-button") {
//!     println!("{} levels deep", path.len());
//! }
//! ```

pub mod block;
pub mod error;
pub mod ids;
pub mod registry;
pub mod tree;

pub use block::{BlockInstance, Column, GlobalSettings, Page, Settings, COLUMNS_KEY, SECTION_KEY};
pub use error::BlockError;
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use registry::{BlockDefinition, BlockRegistry, MapRegistry};
