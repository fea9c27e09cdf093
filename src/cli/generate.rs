//! Image generation command (`cardgen generate`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use cardgen::{GeminiGenerator, GeneratorConfig, PngRasterizer, decode_data_uri};
use clap::Args;

use crate::cli::common::CardArgs;
use crate::cli::utils::{is_png_path, prepare_output};

/// Arguments for `cardgen generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub card: CardArgs,
    /// Description of the image (defaults to the built-in prompt).
    #[arg(long)]
    pub prompt: Option<String>,
    /// Where to write the generated image.
    #[arg(short = 'o', long = "output", default_value = "generated.png")]
    pub output: PathBuf,
    /// Also render the card with the new image into this file or directory.
    #[arg(long = "card")]
    pub card_output: Option<PathBuf>,
    /// Override the provider model.
    #[arg(long)]
    pub model: Option<String>,
    /// Override the provider endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Execute the generate command.
pub fn handle(args: GenerateArgs) -> Result<()> {
    let mut editor = args.card.build_editor()?;
    if let Some(prompt) = args.prompt {
        editor.set_prompt(prompt);
    }

    let mut config = GeneratorConfig::from_env();
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    let generator = GeminiGenerator::new(config).context("failed to set up image generator")?;

    editor.generate(&generator)?;

    let image_ref = editor
        .history()
        .get(0)
        .ok_or_else(|| anyhow!("generator returned no image"))?;
    let (mime, bytes) =
        decode_data_uri(image_ref).ok_or_else(|| anyhow!("generator returned a malformed image"))?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Saved generated {} image to {}", mime, args.output.display());

    if let Some(card_output) = args.card_output {
        let png = editor.export(&PngRasterizer::default())?;
        prepare_output(&card_output)?;
        let target = if is_png_path(&card_output) {
            png.save_as(&card_output)?;
            card_output
        } else {
            png.save_in(&card_output)?
        };
        println!("Saved card to {}", target.display());
    }
    Ok(())
}
