//! Template discovery commands (`cardgen template ...`).

use anyhow::{Context, Result};
use cardgen::templates::TextRole;
use cardgen::{AspectRatio, CardData, TemplateRegistry, render_template};
use clap::{Args, Subcommand};

/// Template subcommands.
#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// List all known templates.
    List,
    /// Show the placeholder copy a template falls back to.
    Show(TemplateShowArgs),
}

/// Arguments for `cardgen template show`.
#[derive(Args, Debug)]
pub struct TemplateShowArgs {
    /// Template name or label.
    pub name: String,
}

/// Execute a template command.
pub fn handle(command: TemplateCommand) -> Result<()> {
    match command {
        TemplateCommand::List => list(),
        TemplateCommand::Show(args) => show(args),
    }
}

fn list() -> Result<()> {
    println!("Available templates:");
    for tpl in TemplateRegistry::list() {
        println!("  - {} ({}): {}", tpl.style, tpl.label, tpl.description);
    }
    Ok(())
}

fn show(args: TemplateShowArgs) -> Result<()> {
    let tpl = TemplateRegistry::get(&args.name)
        .with_context(|| format!("template '{}' not found", args.name))?;
    println!("Template: {} ({})", tpl.style, tpl.label);
    println!("{}", tpl.description);

    let empty = CardData {
        title: String::new(),
        subtitle: String::new(),
        footer_text: String::new(),
        author: String::new(),
        image_url: String::new(),
    };
    let rendered = render_template(tpl.style, &empty, AspectRatio::default());
    for role in [
        TextRole::Title,
        TextRole::Subtitle,
        TextRole::Author,
        TextRole::Footer,
    ] {
        match rendered.text(role) {
            Some(block) if !block.text.is_empty() => {
                println!("  {:<9} {:?} (max {} lines)", format!("{:?}", role), block.text, block.max_lines)
            }
            _ => println!("  {:<9} (omitted when empty)", format!("{:?}", role)),
        }
    }
    Ok(())
}
