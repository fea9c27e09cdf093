//! Core library for social cover cards: content model, templates, headless URL
//! hydration and PNG export.

pub mod automation;
mod card;
pub mod config;
mod editor;
pub mod error;
pub mod generate;
mod history;
pub mod hydrate;
pub mod image;
pub mod templates;

pub use card::{
    AspectRatio, BASE_WIDTH, CardData, CardField, CardStyle, DisplayOptions, PLACEHOLDER_IMAGE_URL,
    decode_data_uri, encode_data_uri, is_remote_image,
};
pub use config::GeneratorConfig;
pub use editor::{DEFAULT_PROMPT, Editor, ExportRequest, ExportedPng, GenerationRequest};
pub use error::{EditorError, GenerateError, Operation, RenderError, SourceError};
pub use generate::{GeminiGenerator, ImageGenerator, StaticGenerator};
pub use history::GenerationHistory;
pub use hydrate::{HydratedState, ViewMode, encode_query, headless_url, hydrate};
pub use crate::image::{PngRasterizer, Rasterizer, SourceLoader};
pub use templates::{RenderedCard, Template, TemplateRegistry, render_template};
