use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use pagecraft_menu::{HttpMenuApi, MenuEditor, MenuItem};

#[derive(Debug, Args)]
pub struct MenuArgs {
    #[command(subcommand)]
    pub command: MenuCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// Fetch a menu and print its tree
    Show {
        menu_id: i64,

        /// Print the nested items as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn menu(args: MenuArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let api = HttpMenuApi::new(config.api_base_url.clone(), config.api_token.clone())?;
    let runtime = tokio::runtime::Runtime::new()?;

    match args.command {
        MenuCommand::Show { menu_id, json } => runtime.block_on(show(&api, menu_id, json)),
    }
}

async fn show(api: &HttpMenuApi, menu_id: i64, json: bool) -> Result<()> {
    let mut editor = MenuEditor::new(menu_id);
    editor.fetch(api).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(editor.items())?);
        return Ok(());
    }

    let name = editor.menu().map(|menu| menu.name.clone()).unwrap_or_default();
    println!("{} {}", name.bright_blue().bold(), format!("#{}", menu_id).dimmed());
    print_items(editor.items(), 1);

    if editor.items().is_empty() {
        println!("   {}", "(no items)".dimmed());
    }
    Ok(())
}

fn print_items(items: &[MenuItem], depth: usize) {
    for item in items {
        println!(
            "{}{} {}",
            "  ".repeat(depth),
            item.title,
            item.url.dimmed()
        );
        print_items(&item.children, depth + 1);
    }
}
