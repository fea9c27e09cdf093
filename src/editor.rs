//! Editing session state.
//!
//! [`Editor`] owns the card, display options and generation history for one
//! session. Everything mutates through its methods. Generation and export are
//! split into `begin_*`/`complete_*` pairs so a caller can run the external
//! call however it likes; while one is in flight a second `begin_*` of the
//! same kind is refused.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::Utc;
use log::{error, info, warn};
use url::Url;

use crate::automation::puppeteer_recipe;
use crate::card::{
    AspectRatio, CardData, CardField, CardStyle, DisplayOptions, decode_data_uri, encode_data_uri,
    is_remote_image,
};
use crate::error::{EditorError, GenerateError, Operation, RenderError};
use crate::generate::ImageGenerator;
use crate::history::GenerationHistory;
use crate::hydrate::{ViewMode, headless_url, hydrate};
use crate::image::{EXPORT_PIXEL_RATIO, Rasterizer};
use crate::templates::{RenderedCard, render_template};

pub const DEFAULT_PROMPT: &str = "A futuristic 3D robot mascot, cute, orange and blue colors, studio lighting, clean background, high detail render";

/// Ticket for a generation started with [`Editor::begin_generation`].
#[derive(Debug)]
pub struct GenerationRequest {
    id: u64,
    prompt: String,
}

impl GenerationRequest {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Ticket for an export started with [`Editor::begin_export`].
#[derive(Debug)]
pub struct ExportRequest {
    id: u64,
}

/// A finished export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPng {
    /// `social-card-<unix millis>.png`
    pub file_name: String,
    pub data_uri: String,
}

impl ExportedPng {
    fn new(data_uri: String) -> Self {
        Self {
            file_name: format!("social-card-{}.png", Utc::now().timestamp_millis()),
            data_uri,
        }
    }

    pub fn bytes(&self) -> anyhow::Result<Vec<u8>> {
        decode_data_uri(&self.data_uri)
            .map(|(_, bytes)| bytes)
            .ok_or_else(|| anyhow!("export did not produce a base64 data URI"))
    }

    /// Write the PNG into `dir` under [`Self::file_name`].
    pub fn save_in(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.bytes()?;
        fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Mutable state of one editing session.
#[derive(Debug, Clone)]
pub struct Editor {
    card: CardData,
    display: DisplayOptions,
    history: GenerationHistory,
    view: ViewMode,
    prompt: String,
    error: Option<String>,
    generation: Option<u64>,
    export: Option<u64>,
    next_request: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Fresh session with built-in defaults.
    pub fn new() -> Self {
        Self {
            card: CardData::default(),
            display: DisplayOptions::default(),
            history: GenerationHistory::new(),
            view: ViewMode::Editor,
            prompt: DEFAULT_PROMPT.to_string(),
            error: None,
            generation: None,
            export: None,
            next_request: 0,
        }
    }

    /// Session hydrated from a page query string.
    pub fn from_query(query: &str) -> Self {
        let mut editor = Self::new();
        editor.view = hydrate(query, &mut editor.card, &mut editor.display);
        editor
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or(""))
    }

    pub fn card(&self) -> &CardData {
        &self.card
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    pub fn is_headless(&self) -> bool {
        self.view == ViewMode::Headless
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Message from the last failed operation, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        self.export.is_some()
    }

    pub fn set_field<S: Into<String>>(&mut self, field: CardField, value: S) {
        self.card.set(field, value);
    }

    pub fn set_style(&mut self, style: CardStyle) {
        self.display.style = style;
    }

    pub fn set_ratio(&mut self, ratio: AspectRatio) {
        self.display.ratio = ratio;
    }

    pub fn set_prompt<S: Into<String>>(&mut self, prompt: S) {
        self.prompt = prompt.into();
    }

    /// Store a local file's bytes as the card image.
    pub fn upload_image(&mut self, bytes: &[u8], mime: &str) {
        self.card.image_url = encode_data_uri(mime, bytes);
    }

    /// Record a freshly generated image and select it.
    pub fn append_generated(&mut self, image_ref: String) {
        self.card.image_url = image_ref.clone();
        self.history.prepend(image_ref);
    }

    /// Use `image_ref` as the card image. The history is left as is.
    pub fn select_image<S: Into<String>>(&mut self, image_ref: S) {
        self.card.image_url = image_ref.into();
    }

    /// Drop a history entry by position.
    ///
    /// The card keeps its current image even when it was the entry removed.
    pub fn delete_generated(&mut self, index: usize) -> Option<String> {
        self.history.remove(index)
    }

    /// Validate the prompt and mark a generation as in flight.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, EditorError> {
        if self.generation.is_some() {
            return Err(EditorError::Busy(Operation::Generation));
        }
        if self.prompt.trim().is_empty() {
            let err = EditorError::MissingPrompt;
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        let id = self.take_request_id();
        self.generation = Some(id);
        Ok(GenerationRequest {
            id,
            prompt: self.prompt.clone(),
        })
    }

    /// Apply the outcome of a generation. On failure card and history are untouched.
    pub fn complete_generation(
        &mut self,
        request: GenerationRequest,
        outcome: Result<String, GenerateError>,
    ) -> Result<(), EditorError> {
        if self.generation != Some(request.id) {
            return Err(EditorError::StaleRequest(Operation::Generation));
        }
        self.generation = None;
        match outcome {
            Ok(image_ref) => {
                info!("generated image added to history");
                self.append_generated(image_ref);
                Ok(())
            }
            Err(err) => {
                error!("image generation failed: {}", err);
                let err = EditorError::GenerationFailed(err);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Run a generation end to end.
    pub fn generate(&mut self, generator: &dyn ImageGenerator) -> Result<(), EditorError> {
        let request = self.begin_generation()?;
        let outcome = generator.generate(request.prompt());
        self.complete_generation(request, outcome)
    }

    /// Check the rasterizer is available and mark an export as in flight.
    pub fn begin_export(&mut self, rasterizer: &dyn Rasterizer) -> Result<ExportRequest, EditorError> {
        if self.export.is_some() {
            return Err(EditorError::Busy(Operation::Export));
        }
        if !rasterizer.is_ready() {
            return Err(EditorError::RasterizerUnavailable);
        }
        if is_remote_image(&self.card.image_url) && !rasterizer.fetches_remote() {
            warn!(
                "rasterizer does not fetch remote images; {} will be painted as a placeholder",
                self.card.image_url
            );
        }
        let id = self.take_request_id();
        self.export = Some(id);
        Ok(ExportRequest { id })
    }

    pub fn complete_export(
        &mut self,
        request: ExportRequest,
        outcome: Result<String, RenderError>,
    ) -> Result<ExportedPng, EditorError> {
        if self.export != Some(request.id) {
            return Err(EditorError::StaleRequest(Operation::Export));
        }
        self.export = None;
        match outcome {
            Ok(data_uri) => Ok(ExportedPng::new(data_uri)),
            Err(err) => {
                error!("download failed: {}", err);
                let err = EditorError::ExportFailed(err);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Rasterize the current card at export density.
    ///
    /// A remote card image is only painted if the rasterizer fetches remote
    /// images (see [`Rasterizer::fetches_remote`]). Otherwise the export still
    /// succeeds with a placeholder in its place and a warning is logged.
    pub fn export(&mut self, rasterizer: &dyn Rasterizer) -> Result<ExportedPng, EditorError> {
        let request = self.begin_export(rasterizer)?;
        let outcome = rasterizer.rasterize(&self.preview(), EXPORT_PIXEL_RATIO);
        self.complete_export(request, outcome)
    }

    /// The card as the current template lays it out.
    pub fn preview(&self) -> RenderedCard {
        render_template(self.display.style, &self.card, self.display.ratio)
    }

    /// Link that reproduces this card in headless mode.
    pub fn headless_url(&self, base: &Url) -> Url {
        headless_url(base, &self.card, &self.display)
    }

    /// Puppeteer script that screenshots this card.
    pub fn automation_recipe(&self, base: &Url) -> String {
        puppeteer_recipe(base, &self.card, &self.display)
    }

    fn take_request_id(&mut self) -> u64 {
        self.next_request += 1;
        self.next_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_stores_data_uri() {
        let mut editor = Editor::new();
        editor.upload_image(b"\x89PNG", "image/png");
        assert!(editor.card().image_url.starts_with("data:image/png;base64,"));
        assert!(editor.history().is_empty());
    }

    #[test]
    fn second_generation_is_refused_while_first_is_in_flight() {
        let mut editor = Editor::new();
        let first = editor.begin_generation().expect("first");
        assert!(editor.is_generating());
        assert!(matches!(
            editor.begin_generation(),
            Err(EditorError::Busy(Operation::Generation))
        ));
        editor
            .complete_generation(first, Ok("data:image/png;base64,AA==".into()))
            .expect("complete");
        assert!(!editor.is_generating());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn completion_order_decides_history_order() {
        let mut editor = Editor::new();
        let a = editor.begin_generation().expect("a");
        editor.complete_generation(a, Ok("img-a".into())).expect("a done");
        let b = editor.begin_generation().expect("b");
        editor.complete_generation(b, Ok("img-b".into())).expect("b done");
        assert_eq!(editor.history().entries(), ["img-b", "img-a"]);
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut editor = Editor::new();
        let first = editor.begin_generation().expect("first");
        let stale = GenerationRequest {
            id: 99,
            prompt: String::new(),
        };
        assert!(matches!(
            editor.complete_generation(stale, Ok("x".into())),
            Err(EditorError::StaleRequest(Operation::Generation))
        ));
        assert!(editor.is_generating());
        editor.complete_generation(first, Ok("x".into())).expect("done");
    }

    #[test]
    fn export_file_name_is_timestamped() {
        let png = ExportedPng::new("data:image/png;base64,AA==".into());
        assert!(png.file_name.starts_with("social-card-"));
        assert!(png.file_name.ends_with(".png"));
        assert_eq!(png.bytes().expect("bytes"), vec![0u8]);
    }
}
