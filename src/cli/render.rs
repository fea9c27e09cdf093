//! Rendering command (`cardgen render`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cardgen::image::{EXPORT_PIXEL_RATIO, MAX_PIXEL_RATIO};
use cardgen::{PngRasterizer, Rasterizer, SourceLoader};
use clap::Args;
use log::info;

use crate::cli::common::CardArgs;
use crate::cli::utils::{is_png_path, prepare_output};

/// Args for `cardgen render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub card: CardArgs,
    /// Output PNG file, or a directory for a timestamped file name.
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,
    /// Pixel density multiplier.
    #[arg(long = "pixel-ratio", default_value_t = EXPORT_PIXEL_RATIO)]
    pub pixel_ratio: u32,
    /// Download http(s) images instead of painting a placeholder.
    #[arg(long = "fetch-remote")]
    pub fetch_remote: bool,
    /// Timeout for remote image downloads, in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Execute the render command.
pub fn handle(args: RenderArgs) -> Result<()> {
    let mut editor = args.card.build_editor()?;
    let pixel_ratio = args.pixel_ratio.clamp(1, MAX_PIXEL_RATIO);

    let loader = if args.fetch_remote {
        SourceLoader::with_remote(Duration::from_secs(args.timeout))?
    } else {
        SourceLoader::offline()
    };
    let rasterizer = PngRasterizer::new(loader);

    let request = editor.begin_export(&rasterizer)?;
    let outcome = rasterizer.rasterize(&editor.preview(), pixel_ratio);
    let png = editor.complete_export(request, outcome)?;

    prepare_output(&args.output)?;
    let target = if is_png_path(&args.output) {
        png.save_as(&args.output)?;
        args.output.clone()
    } else {
        png.save_in(&args.output)
            .with_context(|| format!("failed to save card into {}", args.output.display()))?
    };

    let display = editor.display();
    info!(
        "rendered {} card ({}) at {}x",
        display.style, display.ratio, pixel_ratio
    );
    println!("Saved card to {}", target.display());
    Ok(())
}
