//! # Pagecraft Resolver
//!
//! Render-time substitution of dynamic tags (`{{post_title}}`,
//! `{{site_name}}`, ...) in a block tree.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_resolver::{ContentRecord, SiteMap, TagResolver};
//!
//! let resolver = TagResolver::new(SiteMap::from([("site_name".into(), "Acme".into())]));
//! let mut blocks = page.blocks.clone();
//! resolver.resolve_blocks(&mut blocks, Some(&post), None);
//! ```

pub mod context;
pub mod resolver;

pub use context::{
    Anonymous, ArchiveContext, Author, Clock, ContentRecord, FixedClock, LoopItem, SiteMap, SiteSettings,
    StaticUser, SystemClock, Term, User, UserProvider,
};
pub use resolver::{is_valid_date_format, TagResolver, DEFAULT_DATE_FORMAT, DYNAMIC_PREFIX};
