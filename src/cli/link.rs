//! Headless link commands (`cardgen url`, `cardgen decode`, `cardgen recipe`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardgen::HydratedState;
use clap::Args;
use log::warn;
use url::Url;

use crate::cli::common::CardArgs;
use crate::cli::utils::{parse_page_url, write_output};

/// Arguments for `cardgen url` and `cardgen recipe`.
#[derive(Args, Debug)]
pub struct UrlArgs {
    #[command(flatten)]
    pub card: CardArgs,
    /// Page that serves the card editor.
    #[arg(long, default_value = "http://localhost:3000/")]
    pub base: String,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

/// Arguments for `cardgen decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Full page URL or bare query string.
    pub input: String,
}

pub fn url(args: UrlArgs) -> Result<()> {
    let base = parse_base(&args.base)?;
    let editor = args.card.build_editor()?;
    if !cardgen::is_remote_image(&editor.card().image_url) && !editor.card().image_url.is_empty() {
        warn!("embedded image is not carried in the URL; host it and pass an http(s) --image");
    }
    let link = editor.headless_url(&base);
    write_output(&args.output, &format!("{}\n", link))
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let state = match parse_page_url(&args.input) {
        Some(url) => HydratedState::from_url(&url),
        None => HydratedState::from_query(&args.input),
    };
    let json = serde_json::to_string_pretty(&state).context("failed to serialize state")?;
    println!("{}", json);
    Ok(())
}

pub fn recipe(args: UrlArgs) -> Result<()> {
    let base = parse_base(&args.base)?;
    let editor = args.card.build_editor()?;
    write_output(&args.output, &editor.automation_recipe(&base))
}

fn parse_base(raw: &str) -> Result<Url> {
    Url::parse(raw).with_context(|| format!("invalid base URL '{}'", raw))
}
