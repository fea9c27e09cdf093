use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TITLE: &str = "Claude Code";
pub const DEFAULT_SUBTITLE: &str = "Zero to Hero: 5 Minute Guide to AI Programming";
pub const DEFAULT_FOOTER: &str = "Tutorial";
pub const DEFAULT_AUTHOR: &str = "@AIProductFree";

/// Background used by every template when no image has been chosen.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/800/1000";

/// Text and image content of a card.
///
/// Fields are free text; templates clamp long values visually rather than the
/// model rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub title: String,
    pub subtitle: String,
    pub footer_text: String,
    pub author: String,
    /// Remote `http(s)` URL or an embedded `data:` URI.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Default for CardData {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            footer_text: DEFAULT_FOOTER.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            image_url: String::new(),
        }
    }
}

impl CardData {
    /// Read a field by name.
    pub fn get(&self, field: CardField) -> &str {
        match field {
            CardField::Title => &self.title,
            CardField::Subtitle => &self.subtitle,
            CardField::FooterText => &self.footer_text,
            CardField::Author => &self.author,
            CardField::ImageUrl => &self.image_url,
        }
    }

    /// Overwrite a field by name.
    pub fn set<S: Into<String>>(&mut self, field: CardField, value: S) {
        let slot = match field {
            CardField::Title => &mut self.title,
            CardField::Subtitle => &mut self.subtitle,
            CardField::FooterText => &mut self.footer_text,
            CardField::Author => &mut self.author,
            CardField::ImageUrl => &mut self.image_url,
        };
        *slot = value.into();
    }

    /// The reference templates should draw: the chosen image or the placeholder.
    pub fn background(&self) -> &str {
        if self.image_url.is_empty() {
            PLACEHOLDER_IMAGE_URL
        } else {
            &self.image_url
        }
    }
}

/// Named card fields, matching their query-string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Title,
    Subtitle,
    FooterText,
    Author,
    ImageUrl,
}

impl CardField {
    pub const ALL: [CardField; 5] = [
        CardField::Title,
        CardField::Subtitle,
        CardField::Author,
        CardField::FooterText,
        CardField::ImageUrl,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CardField::Title => "title",
            CardField::Subtitle => "subtitle",
            CardField::FooterText => "footerText",
            CardField::Author => "author",
            CardField::ImageUrl => "imageUrl",
        }
    }
}

/// Visual template applied to the card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    /// Image top, text bottom.
    #[default]
    Editorial,
    /// Full-bleed image with text over a dark gradient.
    Overlay,
    /// Clean bordered card.
    Minimal,
    /// Frosted glass panel over a blurred background.
    Glass,
    /// Neo-brutalist, high contrast.
    Bold,
    /// Centered magazine layout.
    Zen,
}

impl CardStyle {
    pub const ALL: [CardStyle; 6] = [
        CardStyle::Editorial,
        CardStyle::Overlay,
        CardStyle::Minimal,
        CardStyle::Glass,
        CardStyle::Bold,
        CardStyle::Zen,
    ];

    /// Parse the wire value; unknown values yield `None` and the caller keeps its fallback.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardStyle::Editorial => "editorial",
            CardStyle::Overlay => "overlay",
            CardStyle::Minimal => "minimal",
            CardStyle::Glass => "glass",
            CardStyle::Bold => "bold",
            CardStyle::Zen => "zen",
        }
    }
}

impl fmt::Display for CardStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Story,
}

/// Card width in logical pixels; heights follow from the ratio.
pub const BASE_WIDTH: u32 = 450;

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [AspectRatio::Portrait, AspectRatio::Square, AspectRatio::Story];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Portrait => "3:4",
            AspectRatio::Square => "1:1",
            AspectRatio::Story => "9:16",
        }
    }

    /// Logical pixel size of a card at this ratio.
    pub fn dimensions(self) -> (u32, u32) {
        let height = match self {
            AspectRatio::Portrait => BASE_WIDTH * 4 / 3,
            AspectRatio::Square => BASE_WIDTH,
            AspectRatio::Story => BASE_WIDTH * 16 / 9,
        };
        (BASE_WIDTH, height)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style and ratio chosen for the card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub style: CardStyle,
    pub ratio: AspectRatio,
}

/// Whether an image reference points at a remote resource rather than embedded bytes.
///
/// Only the prefix is inspected, so `https://` matches as well.
pub fn is_remote_image(image_ref: &str) -> bool {
    image_ref.starts_with("http")
}

/// Build a `data:<mime>;base64,<payload>` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URI into its mime type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parse_rejects_unknown_values() {
        assert_eq!(CardStyle::parse("glass"), Some(CardStyle::Glass));
        assert_eq!(CardStyle::parse("Glass"), None);
        assert_eq!(CardStyle::parse("neon"), None);
    }

    #[test]
    fn ratio_dimensions() {
        assert_eq!(AspectRatio::Portrait.dimensions(), (450, 600));
        assert_eq!(AspectRatio::Square.dimensions(), (450, 450));
        assert_eq!(AspectRatio::Story.dimensions(), (450, 800));
        assert_eq!(AspectRatio::parse("16:9"), None);
    }

    #[test]
    fn remote_predicate_inspects_prefix_only() {
        assert!(is_remote_image("https://example.com/a.png"));
        assert!(is_remote_image("http://example.com/a.png"));
        assert!(!is_remote_image("data:image/png;base64,AAAA"));
        assert!(!is_remote_image(""));
    }

    #[test]
    fn data_uri_round_trips_bytes() {
        let uri = encode_data_uri("image/jpeg", &[1, 2, 3, 250]);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        let (mime, bytes) = decode_data_uri(&uri).expect("valid uri");
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![1, 2, 3, 250]);
        assert!(decode_data_uri("https://example.com").is_none());
    }

    #[test]
    fn background_falls_back_to_placeholder() {
        let mut card = CardData::default();
        assert_eq!(card.background(), PLACEHOLDER_IMAGE_URL);
        card.set(CardField::ImageUrl, "https://example.com/x.png");
        assert_eq!(card.background(), "https://example.com/x.png");
    }
}
