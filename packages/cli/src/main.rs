mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, inspect, menu, resolve, InitArgs, InspectArgs, MenuArgs, ResolveArgs};

/// Pagecraft CLI - page builder tooling
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter config and block registry
    Init(InitArgs),

    /// Substitute dynamic tags in a page
    Resolve(ResolveArgs),

    /// Print a page's block outline or the path to one block
    Inspect(InspectArgs),

    /// Work with navigation menus
    Menu(MenuArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Resolve(args) => resolve(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Menu(args) => menu(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
