//! # Tag Resolver
//!
//! Replaces dynamic placeholders with contextual content at render time.
//!
//! ```text
//! "{{ post_title }}"  →  strip delimiters  →  "post_title"
//!                                                  ↓
//!        post_ → loop_ → site_/current_ → archive_ → user_
//!                                                  ↓
//!                                        "Hello World" | ""
//! ```
//!
//! Resolution never fails. A key outside every namespace, a key missing from
//! its namespace's table, or a namespace whose context was not supplied all
//! resolve to the empty string.

use crate::context::{
    Anonymous, ArchiveContext, Clock, ContentRecord, LoopItem, SiteSettings, SystemClock, UserProvider,
};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use pagecraft_blocks::{BlockInstance, Column, Settings};
use pagecraft_common::{walk_block_mut, walk_blocks_mut, walk_column_mut, VisitorMut};
use regex::{Captures, Regex};
use serde_json::Value;
use std::fmt::Write;
use std::sync::OnceLock;
use tracing::{debug, instrument, warn};

/// Marks a setting value as a tag to resolve (`"@dynamic:post_title"`)
pub const DYNAMIC_PREFIX: &str = "@dynamic:";

pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

const TIME_FORMAT: &str = "%H:%M";

/// Word limit for excerpts derived from the body
const EXCERPT_WORDS: usize = 55;

fn inline_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("inline tag pattern compiles"))
}

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern compiles"))
}

pub struct TagResolver {
    site: Box<dyn SiteSettings>,
    users: Box<dyn UserProvider>,
    clock: Box<dyn Clock>,
    archive: Option<ArchiveContext>,
    date_format: String,
}

impl TagResolver {
    /// Resolver with no signed-in user and the system clock
    pub fn new(site: impl SiteSettings + 'static) -> Self {
        Self {
            site: Box::new(site),
            users: Box::new(Anonymous),
            clock: Box::new(SystemClock),
            archive: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_user_provider(mut self, users: impl UserProvider + 'static) -> Self {
        self.users = Box::new(users);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_archive(mut self, archive: ArchiveContext) -> Self {
        self.archive = Some(archive);
        self
    }

    /// chrono format string used for every date tag
    ///
    /// A format chrono cannot parse is ignored and the current one kept.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if is_valid_date_format(&format) {
            self.date_format = format;
        } else {
            warn!(format = %format, kept = %self.date_format, "Ignoring invalid date format");
        }
        self
    }

    /// Switch archive context between renders
    pub fn set_archive(&mut self, archive: Option<ArchiveContext>) {
        self.archive = archive;
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Resolve one tag, with or without `{{ }}` delimiters
    pub fn resolve_tag(&self, tag: &str, content: Option<&ContentRecord>, loop_item: Option<&LoopItem>) -> String {
        let key = bare_key(tag);

        let resolved = if key.starts_with("post_") {
            content.and_then(|content| self.post_value(key, content))
        } else if key.starts_with("loop_") {
            loop_item.and_then(|item| self.loop_value(key, item))
        } else if key.starts_with("site_") || key.starts_with("current_") {
            self.site_value(key)
        } else if key.starts_with("archive_") {
            self.archive.as_ref().and_then(|archive| archive_value(key, archive))
        } else if key.starts_with("user_") {
            self.user_value(key)
        } else {
            None
        };

        resolved.unwrap_or_else(|| {
            debug!(tag = %key, "dynamic tag resolved to empty");
            String::new()
        })
    }

    /// Resolve every `@dynamic:` setting in the forest, in place
    ///
    /// Walks children, columns (including column-level settings) and section
    /// blocks. Returns the number of values replaced.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn resolve_blocks(
        &self,
        blocks: &mut [BlockInstance],
        content: Option<&ContentRecord>,
        loop_item: Option<&LoopItem>,
    ) -> usize {
        let mut pass = DynamicSettings {
            resolver: self,
            content,
            loop_item,
            resolved: 0,
        };
        walk_blocks_mut(&mut pass, blocks);
        debug!(resolved = pass.resolved, "resolved dynamic settings");
        pass.resolved
    }

    /// Replace every embedded `{{tag}}` in free text
    pub fn resolve_text(&self, text: &str, content: Option<&ContentRecord>, loop_item: Option<&LoopItem>) -> String {
        inline_tag_pattern()
            .replace_all(text, |caps: &Captures| self.resolve_tag(&caps[1], content, loop_item))
            .into_owned()
    }

    fn format_date(&self, date: Option<DateTime<Utc>>) -> Option<String> {
        format_checked(date?, &self.date_format)
    }

    fn post_value(&self, key: &str, content: &ContentRecord) -> Option<String> {
        match key {
            "post_title" => Some(content.title.clone()),
            "post_content" => Some(content.content.clone()),
            "post_excerpt" => Some(excerpt(content)),
            "post_slug" => Some(content.slug.clone()),
            "post_url" => content.url.clone(),
            "post_date" => self.format_date(content.published_at),
            "post_modified" => self.format_date(content.updated_at),
            "post_author" => content.author.as_ref().map(|author| author.name.clone()),
            "post_featured_image" => content.featured_image.clone(),
            "post_id" => content.id.map(|id| id.to_string()),
            "post_type" => content.content_type.clone(),
            "post_category" => content.categories.first().map(|term| term.name.clone()),
            "post_tags" => Some(
                content
                    .tags
                    .iter()
                    .map(|term| term.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    fn loop_value(&self, key: &str, item: &LoopItem) -> Option<String> {
        let record = &item.record;
        match key {
            "loop_title" => Some(record.title.clone()),
            "loop_excerpt" => Some(excerpt(record)),
            "loop_url" => record.url.clone(),
            "loop_image" => record.featured_image.clone(),
            "loop_date" => self.format_date(record.published_at),
            "loop_author" => record.author.as_ref().map(|author| author.name.clone()),
            "loop_category" => record.categories.first().map(|term| term.name.clone()),
            "loop_index" => Some(item.index.to_string()),
            _ => None,
        }
    }

    fn site_value(&self, key: &str) -> Option<String> {
        match key {
            "site_name" | "site_tagline" | "site_url" | "site_logo" | "site_email" | "current_url" => {
                self.site.get(key)
            }
            "current_year" => format_checked(self.clock.now(), "%Y"),
            "current_date" => self.format_date(Some(self.clock.now())),
            "current_time" => format_checked(self.clock.now(), TIME_FORMAT),
            _ => None,
        }
    }

    fn user_value(&self, key: &str) -> Option<String> {
        let user = self.users.current_user()?;
        match key {
            "user_name" => Some(user.name),
            "user_email" => Some(user.email),
            "user_display_name" => Some(user.display_name.unwrap_or(user.name)),
            "user_id" => Some(user.id.to_string()),
            "user_avatar" => user.avatar,
            "user_role" => user.role,
            _ => None,
        }
    }
}

/// True if chrono can parse every specifier in `format`
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Format without panicking; `None` when chrono rejects the format
fn format_checked(date: DateTime<Utc>, format: &str) -> Option<String> {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => Some(out),
        Err(_) => {
            debug!(format, "date format failed");
            None
        }
    }
}

fn bare_key(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("{{").unwrap_or(tag);
    let tag = tag.strip_suffix("}}").unwrap_or(tag);
    tag.trim()
}

fn archive_value(key: &str, archive: &ArchiveContext) -> Option<String> {
    match key {
        "archive_title" => Some(archive.title.clone()),
        "archive_description" => Some(archive.description.clone()),
        "archive_type" => Some(archive.archive_type.clone()),
        _ => None,
    }
}

/// Stored excerpt, or the first words of the body with markup stripped
fn excerpt(record: &ContentRecord) -> String {
    if let Some(excerpt) = record.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        return excerpt.to_string();
    }

    let text = markup_pattern().replace_all(&record.content, " ");
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > EXCERPT_WORDS {
        format!("{}…", words[..EXCERPT_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

struct DynamicSettings<'a> {
    resolver: &'a TagResolver,
    content: Option<&'a ContentRecord>,
    loop_item: Option<&'a LoopItem>,
    resolved: usize,
}

impl DynamicSettings<'_> {
    fn resolve_settings(&mut self, settings: &mut Settings) {
        for value in settings.values_mut() {
            let Value::String(text) = value else { continue };
            let Some(tag) = text.strip_prefix(DYNAMIC_PREFIX) else { continue };
            *text = self.resolver.resolve_tag(tag, self.content, self.loop_item);
            self.resolved += 1;
        }
    }
}

impl VisitorMut for DynamicSettings<'_> {
    fn visit_block_mut(&mut self, block: &mut BlockInstance) {
        self.resolve_settings(&mut block.settings);
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        self.resolve_settings(&mut column.settings);
        walk_column_mut(self, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Author, FixedClock, SiteMap, StaticUser, Term, User};
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap())
    }

    fn resolver() -> TagResolver {
        TagResolver::new(SiteMap::from([
            ("site_name".to_string(), "Acme".to_string()),
            ("site_url".to_string(), "https://acme.test".to_string()),
        ]))
        .with_clock(clock())
    }

    fn post() -> ContentRecord {
        ContentRecord {
            id: Some(42),
            title: "Hello World".into(),
            content: "<p>First <strong>para</strong></p>".into(),
            slug: "hello-world".into(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap()),
            author: Some(Author {
                name: "Ada".into(),
                email: None,
            }),
            categories: vec![Term {
                name: "News".into(),
                slug: "news".into(),
            }],
            tags: vec![
                Term {
                    name: "rust".into(),
                    slug: "rust".into(),
                },
                Term {
                    name: "web".into(),
                    slug: "web".into(),
                },
            ],
            ..ContentRecord::default()
        }
    }

    #[test]
    fn test_delimiters_and_whitespace_are_stripped() {
        let resolver = resolver();
        let post = post();
        for tag in ["post_title", "{{post_title}}", "{{ post_title }}", "  {{post_title }} "] {
            assert_eq!(resolver.resolve_tag(tag, Some(&post), None), "Hello World");
        }
    }

    #[test]
    fn test_post_fields() {
        let resolver = resolver();
        let post = post();
        let tag = |key| resolver.resolve_tag(key, Some(&post), None);

        assert_eq!(tag("post_id"), "42");
        assert_eq!(tag("post_slug"), "hello-world");
        assert_eq!(tag("post_date"), "January 5, 2024");
        assert_eq!(tag("post_author"), "Ada");
        assert_eq!(tag("post_category"), "News");
        assert_eq!(tag("post_tags"), "rust, web");
        assert_eq!(tag("post_excerpt"), "First para");
        assert_eq!(tag("post_modified"), "");
    }

    #[test]
    fn test_unknown_or_missing_context_is_empty() {
        let resolver = resolver();
        let post = post();

        assert_eq!(resolver.resolve_tag("post_title", None, None), "");
        assert_eq!(resolver.resolve_tag("post_nonsense", Some(&post), None), "");
        assert_eq!(resolver.resolve_tag("loop_title", Some(&post), None), "");
        assert_eq!(resolver.resolve_tag("weather_today", Some(&post), None), "");
        assert_eq!(resolver.resolve_tag("archive_title", None, None), "");
        assert_eq!(resolver.resolve_tag("user_name", None, None), "");
        assert_eq!(resolver.resolve_tag("site_logo", None, None), "");
    }

    #[test]
    fn test_loop_fields() {
        let resolver = resolver();
        let item = LoopItem {
            index: 3,
            record: post(),
        };

        assert_eq!(resolver.resolve_tag("loop_title", None, Some(&item)), "Hello World");
        assert_eq!(resolver.resolve_tag("loop_index", None, Some(&item)), "3");
        assert_eq!(resolver.resolve_tag("loop_image", None, Some(&item)), "");
    }

    #[test]
    fn test_site_and_current() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_tag("site_name", None, None), "Acme");
        assert_eq!(resolver.resolve_tag("current_year", None, None), "2024");
        assert_eq!(resolver.resolve_tag("current_date", None, None), "March 9, 2024");
        assert_eq!(resolver.resolve_tag("current_time", None, None), "14:05");

        let custom = resolver.with_date_format("%Y-%m-%d");
        assert_eq!(custom.resolve_tag("current_date", None, None), "2024-03-09");
    }

    #[test]
    fn test_unparseable_date_format_is_ignored() {
        assert!(!is_valid_date_format("%Q"));
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));

        let resolver = resolver().with_date_format("%Q");
        assert_eq!(resolver.date_format(), DEFAULT_DATE_FORMAT);
        assert_eq!(resolver.resolve_tag("{{current_date}}", None, None), "March 9, 2024");

        let now = resolver.clock.now();
        assert_eq!(format_checked(now, "%Q"), None);
    }

    #[test]
    fn test_archive_and_user() {
        let resolver = resolver()
            .with_archive(ArchiveContext {
                title: "News".into(),
                description: "Latest".into(),
                archive_type: "category".into(),
            })
            .with_user_provider(StaticUser(User {
                id: 7,
                name: "ada".into(),
                email: "ada@acme.test".into(),
                ..User::default()
            }));

        assert_eq!(resolver.resolve_tag("archive_type", None, None), "category");
        assert_eq!(resolver.resolve_tag("user_id", None, None), "7");
        // Falls back to the login name
        assert_eq!(resolver.resolve_tag("user_display_name", None, None), "ada");
        assert_eq!(resolver.resolve_tag("user_role", None, None), "");
    }

    #[test]
    fn test_long_body_excerpt_is_truncated() {
        let record = ContentRecord {
            content: "word ".repeat(80),
            ..ContentRecord::default()
        };
        let text = excerpt(&record);
        assert!(text.ends_with('…'));
        assert_eq!(text.trim_end_matches('…').split_whitespace().count(), EXCERPT_WORDS);
    }

    #[test]
    fn test_resolve_text() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve_text("© {{ current_year }} {{site_name}}. {{nope}}!", None, None),
            "© 2024 Acme. !"
        );
    }

    #[test]
    fn test_resolve_blocks_reaches_every_nesting_form() {
        let resolver = resolver();
        let post = post();
        let mut blocks = vec![BlockInstance::new("s", "section")
            .with_setting("heading", "@dynamic:post_title")
            .with_setting("color", "#fff")
            .with_children(vec![BlockInstance::new("c", "text").with_setting("text", "@dynamic:site_name")])
            .with_columns(vec![{
                let mut column = Column::new(vec![BlockInstance::new("k", "text").with_setting("text", "@dynamic:post_id")]);
                column.settings.insert("label".into(), Value::from("@dynamic:post_slug"));
                column
            }])
            .with_section(vec![BlockInstance::new("b", "text").with_setting("text", "@dynamic:unknown_key")])];

        let count = resolver.resolve_blocks(&mut blocks, Some(&post), None);
        assert_eq!(count, 5);

        let root = &blocks[0];
        assert_eq!(root.settings["heading"], "Hello World");
        assert_eq!(root.settings["color"], "#fff");
        assert_eq!(root.children.as_ref().unwrap()[0].settings["text"], "Acme");
        let column = &root.columns.as_ref().unwrap()[0];
        assert_eq!(column.settings["label"], "hello-world");
        assert_eq!(column.blocks[0].settings["text"], "42");
        assert_eq!(root.section.as_ref().unwrap()[0].settings["text"], "");
    }
}
