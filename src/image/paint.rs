use std::collections::HashMap;
use std::io::Cursor;

use image::imageops::{FilterType, overlay};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use log::warn;

use crate::card::encode_data_uri;
use crate::error::RenderError;
use crate::templates::{Align, Block, Frame, ImageTreatment, RenderedCard, TextBlock};

use super::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph};
use super::source::SourceLoader;
use super::{MAX_PIXEL_RATIO, Rasterizer};

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xe5, 0xe7, 0xeb, 0xff]);
const BLUR_SIGMA: f32 = 8.0;
const ELLIPSIS: &str = "...";

/// Paints rendered cards with `image`/`imageproc` and encodes them as PNG.
///
/// Opaque shapes go through `imageproc`; translucent ones are alpha blended
/// pixel by pixel.
#[derive(Debug, Clone, Default)]
pub struct PngRasterizer {
    loader: SourceLoader,
}

impl PngRasterizer {
    pub fn new(loader: SourceLoader) -> Self {
        Self { loader }
    }
}

impl Rasterizer for PngRasterizer {
    fn fetches_remote(&self) -> bool {
        self.loader.fetches_remote()
    }

    fn rasterize(&self, card: &RenderedCard, pixel_ratio: u32) -> Result<String, RenderError> {
        let image = paint_card(card, pixel_ratio, &self.loader)?;
        let bytes = encode_png(&image)?;
        Ok(encode_data_uri("image/png", &bytes))
    }
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Paint every block of `card` at `pixel_ratio` times its logical size.
///
/// Images that fail to load are painted as a neutral placeholder rather than
/// failing the whole card.
pub fn paint_card(
    card: &RenderedCard,
    pixel_ratio: u32,
    loader: &SourceLoader,
) -> Result<RgbaImage, RenderError> {
    if pixel_ratio == 0 || pixel_ratio > MAX_PIXEL_RATIO {
        return Err(RenderError::PixelRatio(pixel_ratio));
    }
    let (width, height) = card.dimensions();
    let mut canvas = RgbaImage::from_pixel(
        width * pixel_ratio,
        height * pixel_ratio,
        Rgba([0xff, 0xff, 0xff, 0xff]),
    );
    let mut sources: HashMap<&str, Option<DynamicImage>> = HashMap::new();

    for block in &card.blocks {
        match block {
            Block::Fill { frame, color } => {
                let (x, y, w, h) = to_pixels(&canvas, frame);
                blend_rect(&mut canvas, x, y, w, h, *color);
            }
            Block::Image {
                frame,
                source,
                treatment,
            } => {
                let decoded = sources.entry(source.as_str()).or_insert_with(|| {
                    loader
                        .load(source)
                        .map_err(|err| warn!("image unavailable, using placeholder: {}", err))
                        .ok()
                });
                let (x, y, w, h) = to_pixels(&canvas, frame);
                match decoded {
                    Some(img) => {
                        let fitted = apply_treatment(img, w, h, *treatment, pixel_ratio);
                        overlay(&mut canvas, &fitted, x as i64, y as i64);
                    }
                    None => blend_rect(&mut canvas, x, y, w, h, PLACEHOLDER_FILL),
                }
            }
            Block::Shade { frame, top, bottom } => {
                let (x, y, w, h) = to_pixels(&canvas, frame);
                for row in 0..h {
                    let t = if h > 1 { row as f32 / (h - 1) as f32 } else { 1.0 };
                    blend_rect(&mut canvas, x, y + row as i32, w, 1, lerp(*top, *bottom, t));
                }
            }
            Block::Outline {
                frame,
                color,
                thickness,
            } => {
                let (x, y, w, h) = to_pixels(&canvas, frame);
                let t = (thickness * pixel_ratio).min(w / 2).min(h / 2).max(1);
                blend_rect(&mut canvas, x, y, w, t, *color);
                blend_rect(&mut canvas, x, y + (h - t) as i32, w, t, *color);
                blend_rect(&mut canvas, x, y + t as i32, t, h - 2 * t, *color);
                blend_rect(&mut canvas, x + (w - t) as i32, y + t as i32, t, h - 2 * t, *color);
            }
            Block::Dot { frame, color } => {
                let (x, y, w, h) = to_pixels(&canvas, frame);
                blend_circle(&mut canvas, x, y, w.min(h), *color);
            }
            Block::Text(text) => draw_text(&mut canvas, text, pixel_ratio),
        }
    }

    Ok(canvas)
}

fn to_pixels(canvas: &RgbaImage, frame: &Frame) -> (i32, i32, u32, u32) {
    let cw = canvas.width() as f32;
    let ch = canvas.height() as f32;
    let x = (frame.x * cw).round() as i32;
    let y = (frame.y * ch).round() as i32;
    let w = ((frame.width * cw).round() as u32).max(1);
    let h = ((frame.height * ch).round() as u32).max(1);
    (x, y, w, h)
}

fn apply_treatment(
    img: &DynamicImage,
    width: u32,
    height: u32,
    treatment: ImageTreatment,
    pixel_ratio: u32,
) -> RgbaImage {
    let fitted = img.resize_to_fill(width, height, FilterType::Triangle);
    match treatment {
        ImageTreatment::Cover => fitted.to_rgba8(),
        ImageTreatment::Dimmed => fitted.brighten(-25).to_rgba8(),
        ImageTreatment::Blurred => fitted
            .blur(BLUR_SIGMA * pixel_ratio as f32)
            .brighten(-60)
            .to_rgba8(),
        ImageTreatment::Muted => {
            let mut out = fitted.adjust_contrast(25.0).to_rgba8();
            for pixel in out.pixels_mut() {
                let [r, g, b, a] = pixel.0;
                let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8;
                let mix = |c: u8| ((c as f32) * 0.8 + (luma as f32) * 0.2).round() as u8;
                *pixel = Rgba([mix(r), mix(g), mix(b), a]);
            }
            out
        }
    }
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = (a.0[i] as f32 + (b.0[i] as f32 - a.0[i] as f32) * t).round() as u8;
    }
    Rgba(out)
}

fn blend_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    if color.0[3] == 0xff {
        draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(w, h), color);
        return;
    }
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = ((x as i64 + w as i64).max(0) as u32).min(canvas.width());
    let y1 = ((y as i64 + h as i64).max(0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.get_pixel_mut(px, py).blend(&color);
        }
    }
}

fn blend_circle(canvas: &mut RgbaImage, x: i32, y: i32, diameter: u32, color: Rgba<u8>) {
    if color.0[3] == 0xff {
        let r = (diameter / 2) as i32;
        draw_filled_circle_mut(canvas, (x + r, y + r), r, color);
        return;
    }
    let r = diameter as f32 / 2.0;
    let cx = x as f32 + r;
    let cy = y as f32 + r;
    for dy in 0..diameter {
        for dx in 0..diameter {
            let px = x + dx as i32;
            let py = y + dy as i32;
            if px < 0 || py < 0 || px as u32 >= canvas.width() || py as u32 >= canvas.height() {
                continue;
            }
            let fx = px as f32 + 0.5 - cx;
            let fy = py as f32 + 0.5 - cy;
            if fx * fx + fy * fy <= r * r {
                canvas.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
    }
}

/// Greedy word wrap into lines of at most `max_chars`, clamped to `max_lines`.
///
/// Words longer than a line are split. When text is dropped the last kept
/// line ends with an ellipsis.
fn wrap_lines(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let needed = if current.is_empty() { 0 } else { 1 } + word.len();
            if current.chars().count() + needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    let max_lines = max_lines.max(1);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let keep = max_chars.saturating_sub(ELLIPSIS.len());
            let mut chars: Vec<char> = last.chars().take(keep).collect();
            while chars.last() == Some(&' ') {
                chars.pop();
            }
            *last = chars.into_iter().collect::<String>() + ELLIPSIS;
        }
    }
    lines
}

fn draw_text(canvas: &mut RgbaImage, block: &TextBlock, pixel_ratio: u32) {
    let scale = (block.size * pixel_ratio).max(1);
    let advance = (GLYPH_WIDTH as u32 + 1) * scale;
    let line_height = (GLYPH_HEIGHT as u32 + 3) * scale;
    let (x, y, w, _) = to_pixels(canvas, &block.frame);
    let max_chars = ((w + scale) / advance) as usize;

    let text = if block.uppercase {
        block.text.to_uppercase()
    } else {
        block.text.clone()
    };

    for (idx, line) in wrap_lines(&text, max_chars, block.max_lines)
        .iter()
        .enumerate()
    {
        let line_width = (line.chars().count() as u32 * advance).saturating_sub(scale);
        let offset = match block.align {
            Align::Left => 0,
            Align::Center => (w.saturating_sub(line_width) / 2) as i32,
            Align::Right => w.saturating_sub(line_width) as i32,
        };
        let line_y = y + (idx as u32 * line_height) as i32;
        for (col, ch) in line.chars().enumerate() {
            let glyph_x = x + offset + (col as u32 * advance) as i32;
            draw_glyph(canvas, glyph_x, line_y, ch, block.color, scale);
        }
    }
}

fn draw_glyph(canvas: &mut RgbaImage, x: i32, y: i32, ch: char, color: Rgba<u8>, scale: u32) {
    let Some(pattern) = glyph(ch) else {
        if !ch.is_whitespace() {
            // Unsupported characters render as a hollow box.
            let w = GLYPH_WIDTH as u32 * scale;
            let h = GLYPH_HEIGHT as u32 * scale;
            blend_rect(canvas, x, y, w, scale, color);
            blend_rect(canvas, x, y + (h - scale) as i32, w, scale, color);
            blend_rect(canvas, x, y, scale, h, color);
            blend_rect(canvas, x + (w - scale) as i32, y, scale, h, color);
        }
        return;
    };
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as u32 * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                blend_rect(canvas, px, py, scale, scale, color);
            }
        }
    }
}
