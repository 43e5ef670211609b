//! Menu and menu item records
//!
//! Items arrive flat (`parent_id` + `sort_order`) and are edited nested
//! (`children`). An item created in the editor has no numeric `id` until it
//! is saved; until then it is addressed by its `_temp_id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: i64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// Partial update for `PUT /menus/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Server id; `None` until saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Client-side id for unsaved items
    #[serde(rename = "_temp_id", default, skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,

    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub sort_order: i64,

    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,

    #[serde(flatten)]
    pub extras: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

/// Address of an item in the editor, saved or not
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MenuItemKey {
    Id(i64),
    Temp(String),
}

impl fmt::Display for MenuItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItemKey::Id(id) => write!(f, "{}", id),
            MenuItemKey::Temp(temp) => write!(f, "{}", temp),
        }
    }
}

impl From<i64> for MenuItemKey {
    fn from(id: i64) -> Self {
        MenuItemKey::Id(id)
    }
}

impl From<&str> for MenuItemKey {
    fn from(temp: &str) -> Self {
        MenuItemKey::Temp(temp.to_string())
    }
}

impl MenuItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_parent(mut self, parent_id: i64, sort_order: i64) -> Self {
        self.parent_id = Some(parent_id);
        self.sort_order = sort_order;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    /// Server id if saved, else the temp id
    pub fn key(&self) -> Option<MenuItemKey> {
        self.id
            .map(MenuItemKey::Id)
            .or_else(|| self.temp_id.clone().map(MenuItemKey::Temp))
    }

    pub fn matches(&self, key: &MenuItemKey) -> bool {
        match key {
            MenuItemKey::Id(id) => self.id == Some(*id),
            MenuItemKey::Temp(temp) => self.temp_id.as_deref() == Some(temp.as_str()),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Body for `POST /menus/:id/items`: no ids, no children
    pub fn create_payload(&self, parent_id: Option<i64>, sort_order: i64) -> MenuItem {
        MenuItem {
            id: None,
            temp_id: None,
            parent_id,
            sort_order,
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Copy of this item without any children
    pub fn without_children(&self) -> MenuItem {
        MenuItem {
            children: Vec::new(),
            ..self.clone()
        }
    }

    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|child| 1 + child.descendant_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefers_server_id() {
        let mut item = MenuItem::new("Home", "/");
        assert_eq!(item.key(), None);

        item.temp_id = Some("tmp-1".into());
        assert_eq!(item.key(), Some(MenuItemKey::Temp("tmp-1".into())));

        item.id = Some(5);
        assert_eq!(item.key(), Some(MenuItemKey::Id(5)));
        assert!(item.matches(&5.into()));
        assert!(item.matches(&"tmp-1".into()));
    }

    #[test]
    fn test_wire_shape() {
        let item: MenuItem = serde_json::from_str(
            r#"{ "id": 3, "parent_id": null, "sort_order": 1, "title": "Blog", "url": "/blog", "object_type": "page" }"#,
        )
        .unwrap();
        assert_eq!(item.extras["object_type"], "page");

        let mut draft = MenuItem::new("New", "#");
        draft.temp_id = Some("tmp-9".into());
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["_temp_id"], "tmp-9");
        assert!(json.get("id").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_create_payload_strips_ids() {
        let mut item = MenuItem::new("Docs", "/docs").with_children(vec![MenuItem::new("API", "/api")]);
        item.temp_id = Some("tmp-2".into());

        let payload = item.create_payload(Some(10), 2);
        assert_eq!(payload.temp_id, None);
        assert_eq!(payload.parent_id, Some(10));
        assert_eq!(payload.sort_order, 2);
        assert!(payload.children.is_empty());
        assert_eq!(payload.title, "Docs");
    }
}
