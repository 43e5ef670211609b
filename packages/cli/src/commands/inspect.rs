use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::{tree, BlockInstance, BlockRegistry, Column};
use pagecraft_common::{walk_block, walk_blocks, walk_column, Visitor};
use pagecraft_editor::PageDocument;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Page JSON file
    pub page: PathBuf,

    /// Print the breadcrumb path to this block instead of the outline
    #[arg(long)]
    pub id: Option<String>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = Arc::new(config.load_registry(cwd)?);
    let document = PageDocument::load(&args.page)?;

    for id in tree::duplicate_ids(&document.page().blocks) {
        warn!(id = %id, "duplicate block id");
        println!("{} Duplicate block id {}", "⚠️".yellow(), id.bright_white());
    }

    let session = document.open_session(registry.clone(), config.history);

    if let Some(id) = &args.id {
        let path = session.get_block_path(id);
        if path.is_empty() {
            return Err(anyhow!("Block not found: {}", id));
        }

        let crumbs: Vec<String> = path
            .iter()
            .map(|segment| format!("{} {}", segment.label.bold(), format!("({})", segment.id).dimmed()))
            .collect();
        println!("{}", crumbs.join(" › "));
        return Ok(());
    }

    let outline = Outline::build(session.blocks(), &*registry);
    println!("{}", args.page.display().to_string().bright_blue().bold());
    for line in &outline.lines {
        println!("{}", line);
    }

    println!();
    println!("   Blocks: {}", outline.blocks);
    println!("   Global settings: {}", session.global_settings().len());

    Ok(())
}

/// Outline lines for a block forest, columns as sub-headings
struct Outline<'a> {
    registry: &'a dyn BlockRegistry,
    depth: usize,
    column: usize,
    blocks: usize,
    lines: Vec<String>,
}

impl<'a> Outline<'a> {
    fn build(blocks: &[BlockInstance], registry: &'a dyn BlockRegistry) -> Self {
        let mut outline = Self {
            registry,
            depth: 1,
            column: 0,
            blocks: 0,
            lines: Vec::new(),
        };
        walk_blocks(&mut outline, blocks);
        outline
    }
}

impl Visitor for Outline<'_> {
    fn visit_block(&mut self, block: &BlockInstance) {
        let known = self.registry.get(&block.block_type).is_some();
        let label = self.registry.label_for(&block.block_type);
        self.lines.push(format!(
            "{}{} {}",
            "  ".repeat(self.depth),
            if known { label.normal() } else { label.yellow() },
            format!("({})", block.id).dimmed()
        ));
        self.blocks += 1;

        // Column numbering restarts inside every block
        let column = std::mem::replace(&mut self.column, 0);
        self.depth += 1;
        walk_block(self, block);
        self.depth -= 1;
        self.column = column;
    }

    fn visit_column(&mut self, column: &Column) {
        self.column += 1;
        self.lines.push(format!(
            "{}{}",
            "  ".repeat(self.depth),
            format!("column {}", self.column).dimmed()
        ));
        self.depth += 1;
        walk_column(self, column);
        self.depth -= 1;
    }
}
