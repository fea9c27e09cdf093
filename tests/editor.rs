use std::cell::Cell;
use std::fs;
use std::io::Cursor;

use cardgen::{
    CardField, Editor, EditorError, GenerateError, ImageGenerator, PngRasterizer, Rasterizer,
    RenderError, RenderedCard, StaticGenerator,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

/// Counts calls and answers with a canned outcome.
struct FakeGenerator {
    calls: Cell<usize>,
    fail: bool,
}

impl FakeGenerator {
    fn ok() -> Self {
        Self {
            calls: Cell::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: Cell::new(0),
            fail: true,
        }
    }
}

impl ImageGenerator for FakeGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            Err(GenerateError::NoImage)
        } else {
            Ok(format!("data:image/png;base64,{}", prompt.len()))
        }
    }
}

struct UnreadyRasterizer;

impl Rasterizer for UnreadyRasterizer {
    fn is_ready(&self) -> bool {
        false
    }

    fn rasterize(&self, _card: &RenderedCard, _pixel_ratio: u32) -> Result<String, RenderError> {
        panic!("must not be called before the rasterizer is ready");
    }
}

struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn rasterize(&self, _card: &RenderedCard, _pixel_ratio: u32) -> Result<String, RenderError> {
        Err(RenderError::PixelRatio(0))
    }
}

fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 8, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode");
    out.into_inner()
}

#[test]
fn append_then_select_keeps_newest_selected() {
    let mut editor = Editor::new();
    editor.append_generated("img".into());
    editor.select_image("img");
    assert_eq!(editor.card().image_url, "img");
    assert_eq!(editor.history().get(0), Some("img"));
}

#[test]
fn history_is_most_recent_first() {
    let mut editor = Editor::new();
    editor.append_generated("imgA".into());
    editor.append_generated("imgB".into());
    assert_eq!(editor.history().entries(), ["imgB", "imgA"]);
    assert_eq!(editor.card().image_url, "imgB");
}

/// Deleting the selected history entry does not clear the selection. This
/// mirrors long-standing behaviour; change it only with a product decision.
#[test]
fn deleting_selected_entry_keeps_selection() {
    let mut editor = Editor::new();
    editor.append_generated("imgA".into());
    editor.append_generated("imgB".into());
    assert_eq!(editor.card().image_url, "imgB");

    assert_eq!(editor.delete_generated(0).as_deref(), Some("imgB"));
    assert_eq!(editor.card().image_url, "imgB");
    assert!(!editor.history().contains("imgB"));
    assert_eq!(editor.history().entries(), ["imgA"]);
}

#[test]
fn selecting_older_entry_does_not_reorder_history() {
    let mut editor = Editor::new();
    editor.append_generated("imgA".into());
    editor.append_generated("imgB".into());
    editor.select_image("imgA");
    assert_eq!(editor.card().image_url, "imgA");
    assert_eq!(editor.history().entries(), ["imgB", "imgA"]);
}

#[test]
fn blank_prompt_never_reaches_generator() {
    for prompt in ["", "   ", "\n\t"] {
        let mut editor = Editor::new();
        editor.set_prompt(prompt);
        let generator = FakeGenerator::ok();
        let err = editor.generate(&generator).unwrap_err();
        assert!(matches!(err, EditorError::MissingPrompt));
        assert_eq!(generator.calls.get(), 0);
        assert_eq!(editor.error(), Some("Please enter a prompt first."));
        assert!(!editor.is_generating());
    }
}

#[test]
fn successful_generation_selects_and_records_image() {
    let mut editor = Editor::new();
    editor.set_prompt("a cat");
    let generator = FakeGenerator::ok();
    editor.generate(&generator).expect("generate");
    assert_eq!(generator.calls.get(), 1);
    assert_eq!(editor.card().image_url, "data:image/png;base64,5");
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.error(), None);
}

#[test]
fn failed_generation_leaves_state_untouched() {
    let mut editor = Editor::new();
    editor.select_image("https://example.com/kept.png");
    let before = editor.card().clone();

    let err = editor.generate(&FakeGenerator::failing()).unwrap_err();
    assert!(matches!(err, EditorError::GenerationFailed(GenerateError::NoImage)));
    assert_eq!(editor.card(), &before);
    assert!(editor.history().is_empty());
    assert_eq!(
        editor.error(),
        Some("Failed to generate image. Please try again.")
    );
    assert!(!editor.is_generating());

    // Retrying is a fresh, user-triggered call.
    editor.generate(&FakeGenerator::ok()).expect("retry");
    assert_eq!(editor.error(), None);
}

#[test]
fn export_requires_ready_rasterizer() {
    let mut editor = Editor::new();
    let err = editor.export(&UnreadyRasterizer).unwrap_err();
    assert!(matches!(err, EditorError::RasterizerUnavailable));
    assert_eq!(editor.error(), None);
    assert!(!editor.is_exporting());
}

#[test]
fn export_failure_sets_inline_error() {
    let mut editor = Editor::new();
    let before = editor.card().clone();
    let err = editor.export(&BrokenRasterizer).unwrap_err();
    assert!(matches!(err, EditorError::ExportFailed(_)));
    assert_eq!(
        editor.error(),
        Some("Could not download image. Try taking a screenshot.")
    );
    assert_eq!(editor.card(), &before);
    assert!(!editor.is_exporting());
}

#[test]
fn second_export_is_refused_while_in_flight() {
    let mut editor = Editor::new();
    let rasterizer = PngRasterizer::default();
    let first = editor.begin_export(&rasterizer).expect("first");
    assert!(matches!(
        editor.begin_export(&rasterizer),
        Err(EditorError::Busy(_))
    ));
    let outcome = rasterizer.rasterize(&editor.preview(), 1);
    editor.complete_export(first, outcome).expect("complete");
    assert!(!editor.is_exporting());
}

#[test]
fn exported_png_uses_uploaded_image() {
    let mut editor = Editor::new();
    editor.set_field(CardField::Title, "Exported");
    editor.upload_image(&png_bytes([200, 30, 30, 255]), "image/png");

    let png = editor.export(&PngRasterizer::default()).expect("export");
    assert!(png.file_name.starts_with("social-card-"));

    let decoded = image::load_from_memory(&png.bytes().expect("bytes")).expect("png");
    assert_eq!((decoded.width(), decoded.height()), (900, 1200));
    // Editorial puts the image across the top of the card.
    let [r, g, b, a] = decoded.to_rgba8().get_pixel(450, 100).0;
    assert_eq!(a, 255);
    assert!(r.abs_diff(200) <= 2 && g.abs_diff(30) <= 2 && b.abs_diff(30) <= 2);

    let dir = std::env::temp_dir().join(format!("cardgen-export-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("mkdir");
    let path = png.save_in(&dir).expect("save");
    assert!(path.ends_with(&png.file_name));
    assert!(fs::metadata(&path).expect("stat").len() > 0);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn generated_image_flows_into_export() {
    let mut editor = Editor::new();
    let generator = StaticGenerator::new("image/png", &png_bytes([10, 120, 220, 255]));
    editor.generate(&generator).expect("generate");
    assert!(editor.card().image_url.starts_with("data:image/png;base64,"));
    editor.export(&PngRasterizer::default()).expect("export");
}

#[test]
fn offline_export_paints_remote_image_as_placeholder() {
    let mut editor = Editor::new();
    editor.select_image("https://example.invalid/a.png");
    let rasterizer = PngRasterizer::default();
    assert!(!rasterizer.fetches_remote());

    let png = editor.export(&rasterizer).expect("export");
    let decoded = image::load_from_memory(&png.bytes().expect("bytes")).expect("png");
    assert_eq!(decoded.to_rgba8().get_pixel(450, 100).0, [0xe5, 0xe7, 0xeb, 0xff]);
    assert_eq!(editor.error(), None);
}
