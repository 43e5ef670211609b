//! # Block Type Registry
//!
//! Block types are looked up by key; the editor only needs `get`. A registry
//! change can leave stored pages pointing at types that no longer exist, so
//! callers treat a missing definition as "no defaults", never as an error.

use crate::{BlockError, Settings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Definition of a block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    /// Registry key (matches `BlockInstance::block_type`)
    pub name: String,

    /// Human-readable label for breadcrumbs and palettes
    pub label: String,

    /// Settings a fresh instance starts with
    #[serde(default)]
    pub default_settings: Settings,
}

impl BlockDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            default_settings: Settings::new(),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.default_settings.insert(key.into(), value.into());
        self
    }
}

/// Lookup of block definitions by type key
pub trait BlockRegistry: Send + Sync {
    fn get(&self, block_type: &str) -> Option<&BlockDefinition>;

    /// Label for a type, falling back to the type key itself
    fn label_for(&self, block_type: &str) -> String {
        self.get(block_type)
            .map(|definition| definition.label.clone())
            .unwrap_or_else(|| block_type.to_string())
    }
}

/// HashMap-backed registry
#[derive(Debug, Clone, Default)]
pub struct MapRegistry {
    definitions: HashMap<String, BlockDefinition>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any previous one with the same name
    pub fn register(&mut self, definition: BlockDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, definition: BlockDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Parse a JSON array of definitions; duplicate names are rejected
    pub fn from_json(json: &str) -> Result<Self, BlockError> {
        let definitions: Vec<BlockDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();

        for definition in definitions {
            if registry.definitions.contains_key(&definition.name) {
                return Err(BlockError::DuplicateDefinition(definition.name));
            }
            registry.register(definition);
        }

        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, BlockError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl BlockRegistry for MapRegistry {
    fn get(&self, block_type: &str) -> Option<&BlockDefinition> {
        self.definitions.get(block_type)
    }
}
