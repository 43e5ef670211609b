use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::Page;
use pagecraft_common::{read_json, read_json_opt};
use pagecraft_resolver::{ArchiveContext, ContentRecord, LoopItem, SiteMap, StaticUser, TagResolver, User};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Page JSON file (`{ "blocks": [...], "globalSettings": {...} }`)
    pub page: PathBuf,

    /// Content record for `post_` tags
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Loop item for `loop_` tags
    #[arg(long = "loop")]
    pub loop_item: Option<PathBuf>,

    /// Site settings map for `site_` tags
    #[arg(long)]
    pub site: Option<PathBuf>,

    /// Signed-in user for `user_` tags
    #[arg(long)]
    pub user: Option<PathBuf>,

    /// Archive context for `archive_` tags
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn resolve(args: ResolveArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let source = fs::read_to_string(&args.page).with_context(|| format!("Cannot read {}", args.page.display()))?;
    let mut page = Page::from_json(&source)?;

    let content: Option<ContentRecord> = read_json_opt(args.content.as_deref())?;
    let loop_item: Option<LoopItem> = read_json_opt(args.loop_item.as_deref())?;
    let site = read_json_opt::<SiteMap>(args.site.as_deref())?.unwrap_or_default();
    let user: Option<User> = read_json_opt(args.user.as_deref())?;

    let mut resolver = TagResolver::new(site).with_date_format(config.date_format);
    if let Some(user) = user {
        resolver = resolver.with_user_provider(StaticUser(user));
    }
    if let Some(path) = &args.archive {
        resolver = resolver.with_archive(read_json::<ArchiveContext>(path)?);
    }

    let count = resolver.resolve_blocks(&mut page.blocks, content.as_ref(), loop_item.as_ref());
    info!(page = %args.page.display(), resolved = count, "resolved page");

    let json = page.to_json_pretty()?;
    match &args.out {
        Some(out) => {
            fs::write(out, json)?;
            println!(
                "{} Resolved {} dynamic value(s) → {}",
                "✓".green(),
                count,
                out.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
