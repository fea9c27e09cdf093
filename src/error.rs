//! Error types for generation, rendering and editor operations.

use std::fmt;
use thiserror::Error;

use crate::image::MAX_PIXEL_RATIO;

/// Failures of the image generation collaborator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key not found in environment variables")]
    MissingApiKey,

    #[error("request to image provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no image data returned from provider")]
    NoImage,
}

/// Failures resolving an image reference into pixels.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("malformed data URI")]
    InvalidDataUri,

    #[error("remote image fetching is disabled ({0})")]
    RemoteDisabled(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failures of the rasterization collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel ratio {0} out of range 1..={}", MAX_PIXEL_RATIO)]
    PixelRatio(u32),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Suspending operations guarded by a single-flight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generation,
    Export,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Generation => write!(f, "image generation"),
            Operation::Export => write!(f, "export"),
        }
    }
}

/// User-facing failures of editor operations.
///
/// The display strings are the messages shown to the user.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Please enter a prompt first.")]
    MissingPrompt,

    #[error("{0} is already in progress")]
    Busy(Operation),

    #[error("Failed to generate image. Please try again.")]
    GenerationFailed(#[source] GenerateError),

    #[error(
        "Download functionality requires the libraries to load completely. Please wait a moment."
    )]
    RasterizerUnavailable,

    #[error("Could not download image. Try taking a screenshot.")]
    ExportFailed(#[source] RenderError),

    #[error("no matching {0} in flight")]
    StaleRequest(Operation),
}
