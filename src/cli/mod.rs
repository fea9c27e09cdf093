//! Command-line interface wiring for the `cardgen` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod generate;
pub mod link;
pub mod render;
pub mod template;
pub mod utils;

/// Parsed CLI entrypoint for the `cardgen` binary.
#[derive(Parser, Debug)]
#[command(name = "cardgen", version, about = "Social cover card generator")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a card to PNG.
    Render(render::RenderArgs),
    /// Print the headless URL for a card.
    Url(link::UrlArgs),
    /// Show the state a URL or query string hydrates to.
    Decode(link::DecodeArgs),
    /// Print a puppeteer script that screenshots the card.
    Recipe(link::UrlArgs),
    /// Generate a background image from a prompt.
    Generate(generate::GenerateArgs),
    #[command(subcommand)]
    Template(template::TemplateCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render::handle(args),
        Command::Url(args) => link::url(args),
        Command::Decode(args) => link::decode(args),
        Command::Recipe(args) => link::recipe(args),
        Command::Generate(args) => generate::handle(args),
        Command::Template(cmd) => template::handle(cmd),
    }
}
