//! Inputs to tag resolution
//!
//! `ContentRecord` and `LoopItem` are passed with each call. Site settings,
//! the signed-in user, the clock and the archive being listed are set on the
//! resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Author of a content record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Category or tag attached to a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,

    #[serde(default)]
    pub slug: String,
}

/// The post/page being rendered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub title: String,

    /// Body HTML
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(rename = "type", default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub categories: Vec<Term>,

    #[serde(default)]
    pub tags: Vec<Term>,
}

/// One iteration of a query-loop block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopItem {
    /// Position within the loop, starting at 0
    #[serde(default)]
    pub index: usize,

    #[serde(flatten)]
    pub record: ContentRecord,
}

/// Archive listing being rendered (category page, tag page, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveContext {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// "category", "tag", "author", "date", ...
    #[serde(rename = "type", default)]
    pub archive_type: String,
}

/// Signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
}

/// Key-value store backing `site_` tags
pub trait SiteSettings: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory site settings
pub type SiteMap = HashMap<String, String>;

impl SiteSettings for SiteMap {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Authenticated-user lookup backing `user_` tags
pub trait UserProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Nobody signed in
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl UserProvider for Anonymous {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// Fixed user, for previews rendered on behalf of someone
#[derive(Debug, Clone)]
pub struct StaticUser(pub User);

impl UserProvider for StaticUser {
    fn current_user(&self) -> Option<User> {
        Some(self.0.clone())
    }
}

/// Source of "now" for `current_` tags
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
