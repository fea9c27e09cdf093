//! Query-string hydration for headless rendering.
//!
//! A card configuration can be carried in a URL so an external screenshot tool
//! reproduces the same card without interactive input. Decoding never fails:
//! unknown keys and invalid enum values are ignored and the prior value is kept.
//! Encoding drops embedded `data:` images to keep URLs short, so those do not
//! survive a round trip.

use log::debug;
use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

use crate::card::{AspectRatio, CardData, CardField, CardStyle, DisplayOptions, is_remote_image};

pub const VIEW_KEY: &str = "view";
pub const HEADLESS_VIEW: &str = "headless";
pub const STYLE_KEY: &str = "style";
pub const RATIO_KEY: &str = "ratio";

/// Presentation mode, fixed once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Full editor with controls.
    #[default]
    Editor,
    /// Card surface only, for automated screenshots.
    Headless,
}

/// Full state recovered from a query string starting from built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HydratedState {
    pub view: ViewMode,
    pub card: CardData,
    pub display: DisplayOptions,
}

impl HydratedState {
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        state.view = hydrate(query, &mut state.card, &mut state.display);
        state
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or(""))
    }
}

/// Decoded query pairs; lookups return the first occurrence of a key.
struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self { pairs }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Apply a query string onto existing state and report the requested view mode.
///
/// Card fields, style and ratio are only touched when a `title` or `style` key
/// is present, even with an empty value. Empty field values are never applied.
pub fn hydrate(query: &str, card: &mut CardData, display: &mut DisplayOptions) -> ViewMode {
    let params = QueryParams::parse(query);

    let view = if params.get(VIEW_KEY) == Some(HEADLESS_VIEW) {
        ViewMode::Headless
    } else {
        ViewMode::Editor
    };

    if !(params.contains(CardField::Title.key()) || params.contains(STYLE_KEY)) {
        return view;
    }

    for field in CardField::ALL {
        if let Some(value) = params.get(field.key()).filter(|v| !v.is_empty()) {
            card.set(field, value);
        }
    }

    if let Some(raw) = params.get(STYLE_KEY) {
        match CardStyle::parse(raw) {
            Some(style) => display.style = style,
            None => debug!("ignoring unknown style '{}'", raw),
        }
    }

    if let Some(raw) = params.get(RATIO_KEY) {
        match AspectRatio::parse(raw) {
            Some(ratio) => display.ratio = ratio,
            None => debug!("ignoring unknown ratio '{}'", raw),
        }
    }

    view
}

/// Key/value pairs describing the card, in a stable order.
pub fn query_pairs<'a>(card: &'a CardData, display: &DisplayOptions) -> Vec<(&'static str, &'a str)> {
    let mut pairs = vec![
        (VIEW_KEY, HEADLESS_VIEW),
        (CardField::Title.key(), card.title.as_str()),
        (CardField::Subtitle.key(), card.subtitle.as_str()),
        (CardField::Author.key(), card.author.as_str()),
        (CardField::FooterText.key(), card.footer_text.as_str()),
        (STYLE_KEY, display.style.as_str()),
        (RATIO_KEY, display.ratio.as_str()),
    ];
    if is_remote_image(&card.image_url) {
        pairs.push((CardField::ImageUrl.key(), card.image_url.as_str()));
    }
    pairs
}

/// Form-encoded query string (without the leading `?`).
pub fn encode_query(card: &CardData, display: &DisplayOptions) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query_pairs(card, display))
        .finish()
}

/// `base` with its query replaced by the headless configuration.
pub fn headless_url(base: &Url, card: &CardData, display: &DisplayOptions) -> Url {
    let mut url = base.clone();
    url.set_query(Some(&encode_query(card, display)));
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_order_is_stable() {
        let card = CardData {
            title: "Hello World".into(),
            subtitle: "a&b".into(),
            footer_text: "Tag".into(),
            author: "@me".into(),
            image_url: "https://img.example/x.png?w=1".into(),
        };
        let display = DisplayOptions {
            style: CardStyle::Zen,
            ratio: AspectRatio::Story,
        };
        assert_eq!(
            encode_query(&card, &display),
            "view=headless&title=Hello+World&subtitle=a%26b&author=%40me&footerText=Tag\
             &style=zen&ratio=9%3A16&imageUrl=https%3A%2F%2Fimg.example%2Fx.png%3Fw%3D1"
        );
    }

    #[test]
    fn first_occurrence_wins_and_question_mark_is_tolerated() {
        let state = HydratedState::from_query("?title=One&title=Two");
        assert_eq!(state.card.title, "One");
    }

    #[test]
    fn fields_without_gate_key_are_ignored() {
        let state = HydratedState::from_query("subtitle=Only&ratio=1:1");
        assert_eq!(state, HydratedState::default());
    }

    #[test]
    fn style_alone_opens_the_gate() {
        let state = HydratedState::from_query("style=bold&author=Someone&ratio=1%3A1");
        assert_eq!(state.display.style, CardStyle::Bold);
        assert_eq!(state.display.ratio, AspectRatio::Square);
        assert_eq!(state.card.author, "Someone");
        assert_eq!(state.card.title, CardData::default().title);
    }

    #[test]
    fn empty_title_key_still_opens_the_gate() {
        let state = HydratedState::from_query("title=&ratio=1%3A1&author=Ada");
        assert_eq!(state.card.title, CardData::default().title);
        assert_eq!(state.card.author, "Ada");
        assert_eq!(state.display.ratio, AspectRatio::Square);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let state = HydratedState::from_query("title=&subtitle=");
        assert_eq!(state.card, CardData::default());
    }

    #[test]
    fn headless_view_is_independent_of_gate() {
        assert_eq!(HydratedState::from_query("view=headless").view, ViewMode::Headless);
        assert_eq!(HydratedState::from_query("view=full").view, ViewMode::Editor);
    }

    #[test]
    fn headless_url_replaces_existing_query() {
        let base = Url::parse("https://cards.example/?old=1").expect("url");
        let url = headless_url(&base, &CardData::default(), &DisplayOptions::default());
        assert!(url.as_str().starts_with("https://cards.example/?view=headless&title=Claude+Code"));
        assert!(!url.as_str().contains("old=1"));
    }
}
