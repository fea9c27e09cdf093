//! The six card templates.
//!
//! A template turns [`CardData`] into a [`RenderedCard`]: a flat list of
//! blocks positioned in card-relative coordinates. Rendering is pure; the
//! rasterizer in [`crate::image`] paints the blocks.

use anyhow::{Result, anyhow};
use image::Rgba;

use crate::card::{AspectRatio, CardData, CardStyle};

/// Rectangle in fractions of the card's width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub const FULL: Frame = Frame::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How an image block is processed before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTreatment {
    /// Scaled to cover the frame.
    Cover,
    /// Cover, slightly darkened.
    Dimmed,
    /// Cover, gaussian blurred and darkened.
    Blurred,
    /// Cover with reduced saturation and raised contrast.
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Which piece of content a text block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Subtitle,
    Author,
    Footer,
    /// Decorative copy not taken from the card data.
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub frame: Frame,
    pub role: TextRole,
    pub text: String,
    /// Glyph pixel size at 1x.
    pub size: u32,
    pub color: Rgba<u8>,
    /// Lines beyond this are dropped and the last kept line gets an ellipsis.
    pub max_lines: usize,
    pub align: Align,
    pub uppercase: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Fill {
        frame: Frame,
        color: Rgba<u8>,
    },
    Image {
        frame: Frame,
        source: String,
        treatment: ImageTreatment,
    },
    /// Vertical gradient from `top` to `bottom`.
    Shade {
        frame: Frame,
        top: Rgba<u8>,
        bottom: Rgba<u8>,
    },
    Outline {
        frame: Frame,
        color: Rgba<u8>,
        thickness: u32,
    },
    /// Filled circle inscribed in the frame.
    Dot {
        frame: Frame,
        color: Rgba<u8>,
    },
    Text(TextBlock),
}

/// Output of the template selector: everything needed to paint one card.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard {
    pub style: CardStyle,
    pub ratio: AspectRatio,
    pub blocks: Vec<Block>,
}

impl RenderedCard {
    /// Logical size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.ratio.dimensions()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Text(text) => Some(text),
            _ => None,
        })
    }

    /// First text block with the given role.
    pub fn text(&self, role: TextRole) -> Option<&TextBlock> {
        self.texts().find(|text| text.role == role)
    }

    pub fn image_sources(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Image { source, .. } => Some(source.as_str()),
            _ => None,
        })
    }
}

/// Select the layout for `style` and bind `card` into it.
pub fn render_template(style: CardStyle, card: &CardData, ratio: AspectRatio) -> RenderedCard {
    let blocks = match style {
        CardStyle::Editorial => editorial(card),
        CardStyle::Overlay => overlay(card),
        CardStyle::Minimal => minimal(card),
        CardStyle::Glass => glass(card),
        CardStyle::Bold => bold(card),
        CardStyle::Zen => zen(card),
    };
    RenderedCard {
        style,
        ratio,
        blocks,
    }
}

/// Describes one of the built-in templates.
#[derive(Debug, Clone)]
pub struct Template {
    pub style: CardStyle,
    pub label: &'static str,
    pub description: &'static str,
}

/// Registry of built-in templates recognised by the CLI.
pub struct TemplateRegistry;

impl TemplateRegistry {
    pub fn list() -> Vec<&'static Template> {
        TEMPLATES.iter().collect()
    }

    /// Resolve a template by style name or label (case-insensitive).
    pub fn get(name: &str) -> Result<&'static Template> {
        TEMPLATES
            .iter()
            .find(|tpl| {
                tpl.style.as_str().eq_ignore_ascii_case(name) || tpl.label.eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| anyhow!("unknown template '{}'", name))
    }
}

static TEMPLATES: [Template; 6] = [
    Template {
        style: CardStyle::Editorial,
        label: "Classic",
        description: "Image on top, serif headline and byline below.",
    },
    Template {
        style: CardStyle::Overlay,
        label: "Overlay",
        description: "Full-bleed image with text over a dark gradient.",
    },
    Template {
        style: CardStyle::Minimal,
        label: "Minimal",
        description: "Clean bordered card with a tag badge.",
    },
    Template {
        style: CardStyle::Glass,
        label: "Glass",
        description: "Frosted panel floating over a blurred background.",
    },
    Template {
        style: CardStyle::Bold,
        label: "Bold",
        description: "Neo-brutalist window frame, high contrast.",
    },
    Template {
        style: CardStyle::Zen,
        label: "Zen",
        description: "Centered magazine layout with generous whitespace.",
    },
];

fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

fn white() -> Rgba<u8> {
    rgba(0xff, 0xff, 0xff, 0xff)
}

fn black() -> Rgba<u8> {
    rgba(0x00, 0x00, 0x00, 0xff)
}

fn accent() -> Rgba<u8> {
    rgba(0xff, 0x24, 0x42, 0xff)
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

struct Text {
    block: TextBlock,
}

impl Text {
    fn new(role: TextRole, text: String, frame: Frame, size: u32, color: Rgba<u8>) -> Self {
        Self {
            block: TextBlock {
                frame,
                role,
                text,
                size,
                color,
                max_lines: 1,
                align: Align::Left,
                uppercase: false,
            },
        }
    }

    fn lines(mut self, max_lines: usize) -> Self {
        self.block.max_lines = max_lines;
        self
    }

    fn align(mut self, align: Align) -> Self {
        self.block.align = align;
        self
    }

    fn upper(mut self) -> Self {
        self.block.uppercase = true;
        self
    }

    fn build(self) -> Block {
        Block::Text(self.block)
    }
}

fn picture(frame: Frame, card: &CardData, treatment: ImageTreatment) -> Block {
    Block::Image {
        frame,
        source: card.background().to_string(),
        treatment,
    }
}

fn fill(frame: Frame, color: Rgba<u8>) -> Block {
    Block::Fill { frame, color }
}

fn editorial(card: &CardData) -> Vec<Block> {
    let ink = rgba(0x11, 0x18, 0x27, 0xff);
    let muted = rgba(0x6b, 0x72, 0x80, 0xff);
    let mut blocks = vec![
        fill(Frame::FULL, white()),
        picture(Frame::new(0.0, 0.0, 1.0, 0.72), card, ImageTreatment::Cover),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "Add a Title Here"),
            Frame::new(0.053, 0.75, 0.894, 0.1),
            4,
            ink,
        )
        .lines(2)
        .build(),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(
                &card.subtitle,
                "Add a description or subtitle to provide more context.",
            ),
            Frame::new(0.053, 0.855, 0.894, 0.06),
            2,
            muted,
        )
        .lines(2)
        .build(),
        fill(Frame::new(0.053, 0.925, 0.894, 0.002), rgba(0xf3, 0xf4, 0xf6, 0xff)),
        Block::Dot {
            frame: Frame::new(0.053, 0.94, 0.053, 0.04),
            color: rgba(0xe5, 0xe7, 0xeb, 0xff),
        },
    ];
    if let Some(initial) = card.author.chars().next() {
        blocks.push(
            Text::new(
                TextRole::Label,
                initial.to_uppercase().collect(),
                Frame::new(0.053, 0.95, 0.053, 0.03),
                2,
                muted,
            )
            .align(Align::Center)
            .build(),
        );
    }
    blocks.push(
        Text::new(
            TextRole::Author,
            or_placeholder(&card.author, "Author"),
            Frame::new(0.12, 0.95, 0.45, 0.03),
            2,
            rgba(0x4b, 0x55, 0x63, 0xff),
        )
        .build(),
    );
    if !card.footer_text.is_empty() {
        blocks.push(
            Text::new(
                TextRole::Footer,
                format!("| {}", card.footer_text),
                Frame::new(0.58, 0.95, 0.367, 0.03),
                2,
                rgba(0x9c, 0xa3, 0xaf, 0xff),
            )
            .align(Align::Right)
            .upper()
            .build(),
        );
    }
    blocks
}

fn overlay(card: &CardData) -> Vec<Block> {
    let mut blocks = vec![
        fill(Frame::FULL, rgba(0x11, 0x18, 0x27, 0xff)),
        picture(Frame::FULL, card, ImageTreatment::Dimmed),
        Block::Shade {
            frame: Frame::FULL,
            top: rgba(0, 0, 0, 0),
            bottom: rgba(0, 0, 0, 0xe6),
        },
        fill(Frame::new(0.071, 0.6, 0.009, 0.2), accent()),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "Impactful Title"),
            Frame::new(0.1, 0.6, 0.83, 0.13),
            5,
            white(),
        )
        .lines(3)
        .build(),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(&card.subtitle, "Your subtitle goes here."),
            Frame::new(0.1, 0.74, 0.83, 0.06),
            2,
            rgba(0xe5, 0xe7, 0xeb, 0xff),
        )
        .lines(2)
        .build(),
        fill(Frame::new(0.071, 0.88, 0.4, 0.045), rgba(0xff, 0xff, 0xff, 0x33)),
        Text::new(
            TextRole::Author,
            or_placeholder(&card.author, "@username"),
            Frame::new(0.09, 0.893, 0.37, 0.03),
            2,
            white(),
        )
        .build(),
    ];
    if !card.footer_text.is_empty() {
        blocks.push(Block::Outline {
            frame: Frame::new(0.62, 0.88, 0.31, 0.045),
            color: rgba(0xff, 0xff, 0xff, 0x4d),
            thickness: 1,
        });
        blocks.push(
            Text::new(
                TextRole::Footer,
                card.footer_text.clone(),
                Frame::new(0.63, 0.893, 0.29, 0.03),
                2,
                rgba(0xff, 0xff, 0xff, 0xcc),
            )
            .align(Align::Center)
            .upper()
            .build(),
        );
    }
    blocks
}

fn minimal(card: &CardData) -> Vec<Block> {
    let ink = rgba(0x11, 0x18, 0x27, 0xff);
    vec![
        fill(Frame::FULL, rgba(0xf5, 0xf5, 0xf5, 0xff)),
        fill(Frame::new(0.035, 0.027, 0.93, 0.946), white()),
        Block::Outline {
            frame: Frame::new(0.035, 0.027, 0.93, 0.946),
            color: rgba(0xf3, 0xf4, 0xf6, 0xff),
            thickness: 1,
        },
        picture(Frame::new(0.053, 0.04, 0.894, 0.6), card, ImageTreatment::Cover),
        fill(Frame::new(0.7, 0.06, 0.22, 0.04), rgba(0xff, 0xff, 0xff, 0xe6)),
        Text::new(
            TextRole::Footer,
            or_placeholder(&card.footer_text, "Cover"),
            Frame::new(0.71, 0.07, 0.2, 0.025),
            2,
            ink,
        )
        .align(Align::Center)
        .upper()
        .build(),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "Minimal Title"),
            Frame::new(0.08, 0.67, 0.84, 0.09),
            4,
            ink,
        )
        .lines(2)
        .build(),
        fill(Frame::new(0.08, 0.77, 0.107, 0.006), accent()),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(&card.subtitle, "A clean description area."),
            Frame::new(0.08, 0.79, 0.84, 0.09),
            2,
            rgba(0x6b, 0x72, 0x80, 0xff),
        )
        .lines(3)
        .build(),
        Block::Dot {
            frame: Frame::new(0.08, 0.915, 0.045, 0.033),
            color: rgba(0, 0, 0, 0x99),
        },
        Text::new(
            TextRole::Author,
            or_placeholder(&card.author, "Creator"),
            Frame::new(0.14, 0.92, 0.7, 0.03),
            2,
            rgba(0, 0, 0, 0x99),
        )
        .build(),
    ]
}

fn glass(card: &CardData) -> Vec<Block> {
    let panel = Frame::new(0.053, 0.04, 0.894, 0.92);
    vec![
        fill(Frame::FULL, rgba(0x11, 0x18, 0x27, 0xff)),
        picture(Frame::FULL, card, ImageTreatment::Blurred),
        fill(panel, rgba(0xff, 0xff, 0xff, 0x33)),
        Block::Outline {
            frame: panel,
            color: rgba(0xff, 0xff, 0xff, 0x66),
            thickness: 1,
        },
        picture(Frame::new(0.064, 0.048, 0.872, 0.58), card, ImageTreatment::Cover),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "Glassmorphism"),
            Frame::new(0.1, 0.66, 0.8, 0.08),
            3,
            white(),
        )
        .lines(2)
        .build(),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(&card.subtitle, "A modern, frosted glass aesthetic."),
            Frame::new(0.1, 0.75, 0.8, 0.08),
            2,
            rgba(0xff, 0xff, 0xff, 0xcc),
        )
        .lines(3)
        .build(),
        fill(Frame::new(0.1, 0.86, 0.8, 0.002), rgba(0xff, 0xff, 0xff, 0x33)),
        fill(Frame::new(0.1, 0.875, 0.36, 0.04), rgba(0, 0, 0, 0x33)),
        Text::new(
            TextRole::Author,
            or_placeholder(&card.author, "@user"),
            Frame::new(0.115, 0.885, 0.33, 0.025),
            2,
            rgba(0xff, 0xff, 0xff, 0xe6),
        )
        .build(),
        Text::new(
            TextRole::Footer,
            card.footer_text.clone(),
            Frame::new(0.5, 0.885, 0.4, 0.025),
            2,
            rgba(0xff, 0xff, 0xff, 0xb3),
        )
        .align(Align::Right)
        .upper()
        .build(),
    ]
}

fn bold(card: &CardData) -> Vec<Block> {
    let window = Frame::new(0.035, 0.027, 0.9, 0.93);
    vec![
        fill(Frame::FULL, rgba(0xf3, 0xf0, 0xff, 0xff)),
        Block::Outline {
            frame: Frame::FULL,
            color: black(),
            thickness: 4,
        },
        fill(Frame::new(0.053, 0.04, 0.9, 0.93), black()),
        fill(window, white()),
        Block::Outline {
            frame: window,
            color: black(),
            thickness: 2,
        },
        fill(Frame::new(0.035, 0.027, 0.9, 0.067), black()),
        Block::Dot {
            frame: Frame::new(0.06, 0.05, 0.027, 0.02),
            color: rgba(0xef, 0x44, 0x44, 0xff),
        },
        Block::Dot {
            frame: Frame::new(0.097, 0.05, 0.027, 0.02),
            color: rgba(0xea, 0xb3, 0x08, 0xff),
        },
        Block::Dot {
            frame: Frame::new(0.134, 0.05, 0.027, 0.02),
            color: rgba(0x22, 0xc5, 0x5e, 0xff),
        },
        Text::new(
            TextRole::Footer,
            or_placeholder(&card.footer_text, "Terminal"),
            Frame::new(0.45, 0.05, 0.46, 0.025),
            2,
            white(),
        )
        .align(Align::Right)
        .upper()
        .build(),
        picture(Frame::new(0.035, 0.094, 0.9, 0.55), card, ImageTreatment::Cover),
        fill(Frame::new(0.07, 0.58, 0.3, 0.045), black()),
        fill(Frame::new(0.062, 0.574, 0.3, 0.045), white()),
        Block::Outline {
            frame: Frame::new(0.062, 0.574, 0.3, 0.045),
            color: black(),
            thickness: 2,
        },
        Text::new(
            TextRole::Label,
            "IMG_SRC.JPG".to_string(),
            Frame::new(0.072, 0.587, 0.28, 0.025),
            2,
            black(),
        )
        .build(),
        fill(Frame::new(0.035, 0.644, 0.9, 0.006), black()),
        fill(Frame::new(0.035, 0.65, 0.9, 0.307), rgba(0xfd, 0xe0, 0x47, 0xff)),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "BOLD STATEMENT"),
            Frame::new(0.07, 0.67, 0.83, 0.17),
            5,
            black(),
        )
        .lines(3)
        .upper()
        .build(),
        fill(Frame::new(0.07, 0.85, 0.83, 0.003), black()),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(
                &card.subtitle,
                "Neo-brutalist design for high impact visuals.",
            ),
            Frame::new(0.07, 0.865, 0.83, 0.07),
            2,
            rgba(0, 0, 0, 0xcc),
        )
        .lines(2)
        .build(),
    ]
}

fn zen(card: &CardData) -> Vec<Block> {
    let gray = rgba(0x9c, 0xa3, 0xaf, 0xff);
    vec![
        fill(Frame::FULL, rgba(0xf8, 0xf5, 0xf2, 0xff)),
        picture(Frame::new(0.0, 0.0, 1.0, 0.6), card, ImageTreatment::Muted),
        Text::new(
            TextRole::Footer,
            or_placeholder(&card.footer_text, "Issue 01"),
            Frame::new(0.1, 0.64, 0.8, 0.025),
            2,
            gray,
        )
        .align(Align::Center)
        .upper()
        .build(),
        Text::new(
            TextRole::Title,
            or_placeholder(&card.title, "The Zen Mode"),
            Frame::new(0.1, 0.68, 0.8, 0.08),
            3,
            rgba(0x1f, 0x29, 0x37, 0xff),
        )
        .lines(2)
        .align(Align::Center)
        .build(),
        fill(Frame::new(0.482, 0.775, 0.036, 0.002), rgba(0xd1, 0xd5, 0xdb, 0xff)),
        Text::new(
            TextRole::Subtitle,
            or_placeholder(&card.subtitle, "Focus on typography and whitespace."),
            Frame::new(0.2, 0.79, 0.6, 0.09),
            2,
            rgba(0x6b, 0x72, 0x80, 0xff),
        )
        .lines(3)
        .align(Align::Center)
        .build(),
        Text::new(
            TextRole::Author,
            or_placeholder(&card.author, "Author"),
            Frame::new(0.1, 0.92, 0.8, 0.025),
            2,
            rgba(0x11, 0x18, 0x27, 0xff),
        )
        .align(Align::Center)
        .upper()
        .build(),
        Block::Outline {
            frame: Frame::FULL,
            color: white(),
            thickness: 16,
        },
    ]
}
