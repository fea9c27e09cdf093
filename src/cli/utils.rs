//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cardgen::{Editor, is_remote_image};
use image::ImageFormat;
use url::Url;

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Parse `raw` as an absolute page URL, or `None` if it is a bare query string.
pub fn parse_page_url(raw: &str) -> Option<Url> {
    if raw.contains("://") {
        Url::parse(raw).ok()
    } else {
        None
    }
}

/// Set the card image from a URL, data URI or local file.
pub fn load_image_arg(editor: &mut Editor, image: &str) -> Result<()> {
    if is_remote_image(image) || image.starts_with("data:") {
        editor.select_image(image);
        return Ok(());
    }
    let path = Path::new(image);
    let bytes = fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    let mime = ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    editor.upload_image(&bytes, mime);
    Ok(())
}

/// Whether `path` names a single PNG file rather than an output directory.
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Create the directory that will hold `path` (or `path` itself for directories).
pub fn prepare_output(path: &Path) -> Result<()> {
    let dir = if is_png_path(path) {
        path.parent().filter(|p| !p.as_os_str().is_empty())
    } else {
        Some(path)
    };
    if let Some(dir) = dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}
