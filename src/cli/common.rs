//! Shared clap helper types for CLI commands.

use anyhow::Result;
use cardgen::{AspectRatio, CardField, CardStyle, Editor};
use clap::{Args, ValueEnum};

use crate::cli::utils::{load_image_arg, parse_page_url};

/// Template selector accepted by CLI commands.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StyleArg {
    Editorial,
    Overlay,
    Minimal,
    Glass,
    Bold,
    Zen,
}

impl From<StyleArg> for CardStyle {
    fn from(value: StyleArg) -> CardStyle {
        match value {
            StyleArg::Editorial => CardStyle::Editorial,
            StyleArg::Overlay => CardStyle::Overlay,
            StyleArg::Minimal => CardStyle::Minimal,
            StyleArg::Glass => CardStyle::Glass,
            StyleArg::Bold => CardStyle::Bold,
            StyleArg::Zen => CardStyle::Zen,
        }
    }
}

/// Aspect ratio selector.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RatioArg {
    #[value(name = "3:4")]
    Portrait,
    #[value(name = "1:1")]
    Square,
    #[value(name = "9:16")]
    Story,
}

impl From<RatioArg> for AspectRatio {
    fn from(value: RatioArg) -> AspectRatio {
        match value {
            RatioArg::Portrait => AspectRatio::Portrait,
            RatioArg::Square => AspectRatio::Square,
            RatioArg::Story => AspectRatio::Story,
        }
    }
}

/// Card content flags shared by every command that builds a card.
#[derive(Args, Debug, Clone)]
pub struct CardArgs {
    /// Hydrate from a page URL or query string before applying other flags.
    #[arg(long)]
    pub query: Option<String>,
    /// Main headline.
    #[arg(long)]
    pub title: Option<String>,
    /// Short description.
    #[arg(long)]
    pub subtitle: Option<String>,
    /// Author handle.
    #[arg(long)]
    pub author: Option<String>,
    /// Footer tag.
    #[arg(long = "footer")]
    pub footer_text: Option<String>,
    /// Background image: local file, http(s) URL or data URI.
    #[arg(long)]
    pub image: Option<String>,
    /// Visual template.
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,
    /// Aspect ratio.
    #[arg(long, value_enum)]
    pub ratio: Option<RatioArg>,
}

impl CardArgs {
    /// Build a session from `--query` (if any) and apply explicit flags on top.
    pub fn build_editor(&self) -> Result<Editor> {
        let mut editor = match self.query.as_deref() {
            Some(raw) => match parse_page_url(raw) {
                Some(url) => Editor::from_url(&url),
                None => Editor::from_query(raw),
            },
            None => Editor::new(),
        };

        let fields = [
            (CardField::Title, &self.title),
            (CardField::Subtitle, &self.subtitle),
            (CardField::Author, &self.author),
            (CardField::FooterText, &self.footer_text),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                editor.set_field(field, value.as_str());
            }
        }
        if let Some(style) = self.style {
            editor.set_style(style.into());
        }
        if let Some(ratio) = self.ratio {
            editor.set_ratio(ratio.into());
        }
        if let Some(image) = self.image.as_deref() {
            load_image_arg(&mut editor, image)?;
        }
        Ok(editor)
    }
}
