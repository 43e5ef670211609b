//! # Block Model
//!
//! A page is a forest of [`BlockInstance`] nodes. Blocks nest in three places
//! in the stored JSON:
//!
//! ```text
//! { "id": "a", "type": "row", "children": [ ... ] }                     // children
//! { "id": "b", "type": "columns", "settings": { "columns": [           // column form
//!     { "width": "50%", "blocks": [ ... ] } ] } }
//! { "id": "c", "type": "section", "settings": { "blocks": [ ... ] } }   // section form
//! ```
//!
//! On load the two settings-based forms are lifted out of `settings` into
//! typed fields (`columns`, `section`), and written back on save so the stored
//! shape survives a round trip. Everything that walks a tree goes through
//! [`BlockInstance::child_lists`], which yields the nested lists of all three
//! forms in one order: `children`, then each column, then the section.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Untyped settings bag attached to every block
pub type Settings = serde_json::Map<String, Value>;

/// Layout-wide settings (container width, spacing token, ...)
pub type GlobalSettings = serde_json::Map<String, Value>;

/// Settings key holding column-form nested blocks
pub const COLUMNS_KEY: &str = "columns";

/// Settings key holding section-form nested blocks
pub const SECTION_KEY: &str = "blocks";

/// One node of the page-builder tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct BlockInstance {
    /// Opaque identifier, stable across moves and edits
    pub id: String,

    /// Key into the block-type registry
    pub block_type: String,

    /// Settings without the lifted nested-block keys
    pub settings: Settings,

    /// Array-form children
    pub children: Option<Vec<BlockInstance>>,

    /// Column-form nested blocks (`settings.columns[].blocks`)
    pub columns: Option<Vec<Column>>,

    /// Section-form nested blocks (`settings.blocks`)
    pub section: Option<Vec<BlockInstance>>,
}

/// One column of a column-form container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub blocks: Vec<BlockInstance>,

    /// Column-level settings (width, alignment, ...)
    #[serde(flatten)]
    pub settings: Settings,
}

impl Column {
    pub fn new(blocks: Vec<BlockInstance>) -> Self {
        Self {
            blocks,
            settings: Settings::new(),
        }
    }
}

impl BlockInstance {
    /// Create a leaf block with empty settings
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            settings: Settings::new(),
            children: None,
            columns: None,
            section: None,
        }
    }

    /// Replace the settings; well-formed nested-block keys become typed fields
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self.lift_nested();
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BlockInstance>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_section(mut self, blocks: Vec<BlockInstance>) -> Self {
        self.section = Some(blocks);
        self
    }

    /// Move `columns`/`blocks` settings into the typed fields
    ///
    /// Only a field that is still `None` is filled; malformed values stay in
    /// `settings` as plain data.
    pub fn lift_nested(&mut self) {
        if self.columns.is_none() {
            self.columns = lift::<Vec<Column>>(&mut self.settings, COLUMNS_KEY);
        }
        if self.section.is_none() {
            self.section = lift::<Vec<BlockInstance>>(&mut self.settings, SECTION_KEY);
        }
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Every nested block list, in traversal order
    pub fn child_lists(&self) -> Vec<&Vec<BlockInstance>> {
        let mut lists = Vec::new();
        if let Some(children) = &self.children {
            lists.push(children);
        }
        if let Some(columns) = &self.columns {
            lists.extend(columns.iter().map(|column| &column.blocks));
        }
        if let Some(section) = &self.section {
            lists.push(section);
        }
        lists
    }

    /// Mutable counterpart of [`child_lists`](Self::child_lists)
    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<BlockInstance>> {
        let mut lists = Vec::new();
        if let Some(children) = &mut self.children {
            lists.push(children);
        }
        if let Some(columns) = &mut self.columns {
            lists.extend(columns.iter_mut().map(|column| &mut column.blocks));
        }
        if let Some(section) = &mut self.section {
            lists.push(section);
        }
        lists
    }

    /// True if the block carries any nested list, even an empty one
    pub fn is_container(&self) -> bool {
        self.children.is_some() || self.columns.is_some() || self.section.is_some()
    }

    /// True if any nested list holds at least one block
    pub fn has_descendants(&self) -> bool {
        self.child_lists().iter().any(|list| !list.is_empty())
    }

    /// Number of blocks below this one
    pub fn descendant_count(&self) -> usize {
        self.child_lists()
            .iter()
            .flat_map(|list| list.iter())
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Stored JSON shape of a block
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,

    #[serde(rename = "type")]
    block_type: String,

    #[serde(default)]
    settings: Settings,

    #[serde(default)]
    children: Option<Vec<BlockInstance>>,
}

impl From<RawBlock> for BlockInstance {
    fn from(raw: RawBlock) -> Self {
        let mut block = Self {
            id: raw.id,
            block_type: raw.block_type,
            settings: raw.settings,
            children: raw.children,
            columns: None,
            section: None,
        };
        block.lift_nested();
        block
    }
}

/// Take `key` out of `settings` if it parses as `T`; otherwise leave it alone
fn lift<T: serde::de::DeserializeOwned>(settings: &mut Settings, key: &str) -> Option<T> {
    let value = settings.remove(key)?;
    if !value.is_array() {
        settings.insert(key.to_string(), value);
        return None;
    }

    match serde_json::from_value::<T>(value.clone()) {
        Ok(lifted) => Some(lifted),
        Err(_) => {
            settings.insert(key.to_string(), value);
            None
        }
    }
}

#[derive(Serialize)]
struct StoredSettings<'a> {
    #[serde(flatten)]
    settings: &'a Settings,

    #[serde(rename = "columns", skip_serializing_if = "Option::is_none")]
    columns: Option<&'a Vec<Column>>,

    #[serde(rename = "blocks", skip_serializing_if = "Option::is_none")]
    section: Option<&'a Vec<BlockInstance>>,
}

#[derive(Serialize)]
struct StoredBlock<'a> {
    id: &'a str,

    #[serde(rename = "type")]
    block_type: &'a str,

    settings: StoredSettings<'a>,

    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a Vec<BlockInstance>>,
}

impl Serialize for BlockInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredBlock {
            id: &self.id,
            block_type: &self.block_type,
            settings: StoredSettings {
                settings: &self.settings,
                columns: self.columns.as_ref(),
                section: self.section.as_ref(),
            },
            children: self.children.as_ref(),
        }
        .serialize(serializer)
    }
}

/// A stored page: the block forest plus layout-wide settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub blocks: Vec<BlockInstance>,

    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl Page {
    pub fn from_json(json: &str) -> Result<Self, crate::BlockError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, crate::BlockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
