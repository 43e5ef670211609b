use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const REGISTRY_FILE: &str = "blocks.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// CMS API base URL
    #[arg(short, long)]
    pub api_base_url: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft project...".bright_blue().bold());

    // Starter block definitions
    let registry_path = PathBuf::from(cwd).join(REGISTRY_FILE);
    if !registry_path.exists() {
        let registry = r##"[
  { "name": "section", "label": "Section" },
  { "name": "row", "label": "Row" },
  { "name": "heading", "label": "Heading", "defaultSettings": { "text": "Heading", "level": 2 } },
  { "name": "text", "label": "Text", "defaultSettings": { "text": "" } },
  { "name": "image", "label": "Image", "defaultSettings": { "src": "", "alt": "" } },
  { "name": "button", "label": "Button", "defaultSettings": { "text": "Click me", "url": "#" } }
]
"##;
        fs::write(&registry_path, registry)?;
        println!("  {} Created {}", "✓".green(), REGISTRY_FILE);
    }

    let mut config = Config {
        registry: Some(REGISTRY_FILE.to_string()),
        ..Config::default()
    };
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add your block types to {}", REGISTRY_FILE);
    println!("  2. Run: pagecraft inspect page.json");
    println!("  3. Run: pagecraft resolve page.json --content post.json");

    Ok(())
}
