use pagecraft_blocks::{BlockInstance, GlobalSettings, Page};
use serde::{Deserialize, Serialize};

/// Everything a history snapshot captures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderState {
    pub blocks: Vec<BlockInstance>,
    pub global_settings: GlobalSettings,

    /// Root-level index of the block open in the settings panel
    pub editing_index: Option<usize>,

    /// Selected block anywhere in the tree
    pub active_block_id: Option<String>,
}

impl BuilderState {
    pub fn from_page(page: Page) -> Self {
        Self {
            blocks: page.blocks,
            global_settings: page.global_settings,
            editing_index: None,
            active_block_id: None,
        }
    }

    pub fn to_page(&self) -> Page {
        Page {
            blocks: self.blocks.clone(),
            global_settings: self.global_settings.clone(),
        }
    }
}
