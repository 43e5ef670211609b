use serde::{Deserialize, Serialize};

/// How the clipboard content was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardAction {
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry<T> {
    pub item: T,
    pub action: ClipboardAction,
}

/// Single-slot clipboard owned by one editor session
#[derive(Debug, Clone)]
pub struct Clipboard<T> {
    slot: Option<ClipboardEntry<T>>,
}

impl<T> Clipboard<T> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Store a copy, replacing whatever was held
    pub fn copy(&mut self, item: T) {
        self.slot = Some(ClipboardEntry {
            item,
            action: ClipboardAction::Copy,
        });
    }

    /// Store a cut item, replacing whatever was held
    pub fn cut(&mut self, item: T) {
        self.slot = Some(ClipboardEntry {
            item,
            action: ClipboardAction::Cut,
        });
    }

    pub fn peek(&self) -> Option<&ClipboardEntry<T>> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<ClipboardEntry<T>> {
        self.slot.take()
    }

    pub fn action(&self) -> Option<ClipboardAction> {
        self.slot.as_ref().map(|entry| entry.action)
    }

    pub fn has_content(&self) -> bool {
        self.slot.is_some()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T> Default for Clipboard<T> {
    fn default() -> Self {
        Self::new()
    }
}
