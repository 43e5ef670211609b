//! # Page Document
//!
//! A stored page and where it came from.
//!
//! - **Memory-backed**: parsed from a JSON string (tests, previews, API bodies)
//! - **File-backed**: loaded from disk, can be saved back
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Session → Edit → to_page → Save
//!   ↓        ↓                       ↓
//! File   history                   File
//! ```

use crate::{BuilderSession, EditorConfig, EditorError};
use pagecraft_blocks::{BlockRegistry, Page};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct PageDocument {
    /// Source file, if file-backed
    path: Option<PathBuf>,

    /// Current version number (increments on each update)
    pub version: u64,

    page: Page,
    dirty: bool,
}

impl PageDocument {
    /// Memory-backed document from JSON
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(Self {
            path: None,
            version: 0,
            page: Page::from_json(json)?,
            dirty: false,
        })
    }

    /// File-backed document
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            version: 0,
            page: Page::from_json(&source)?,
            dirty: false,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace content (typically `session.to_page()` after editing)
    pub fn set_page(&mut self, page: Page) {
        if page != self.page {
            self.page = page;
            self.version += 1;
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.as_ref().ok_or(EditorError::NotFileBacked)?;
        std::fs::write(path, self.page.to_json_pretty()?)?;
        self.dirty = false;
        Ok(())
    }

    /// Open a builder session on a copy of this page
    pub fn open_session(&self, registry: Arc<dyn BlockRegistry>, config: EditorConfig) -> BuilderSession {
        BuilderSession::from_page(registry, self.page.clone(), config)
    }
}
