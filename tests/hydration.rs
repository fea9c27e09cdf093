use cardgen::{
    AspectRatio, CardData, CardStyle, DisplayOptions, Editor, HydratedState, ViewMode,
    encode_query, hydrate,
};
use pretty_assertions::assert_eq;

fn sample_card(image_url: &str) -> CardData {
    CardData {
        title: "Rust & You: 100% safe?".into(),
        subtitle: "Line one\nLine two with = and + signs".into(),
        footer_text: "Guide #3".into(),
        author: "@ferris".into(),
        image_url: image_url.into(),
    }
}

fn all_displays() -> Vec<DisplayOptions> {
    CardStyle::ALL
        .iter()
        .flat_map(|&style| {
            AspectRatio::ALL
                .iter()
                .map(move |&ratio| DisplayOptions { style, ratio })
        })
        .collect()
}

#[test]
fn remote_image_configurations_round_trip() {
    let card = sample_card("https://images.example.com/cover.jpg?w=800&q=80");
    for display in all_displays() {
        let state = HydratedState::from_query(&encode_query(&card, &display));
        assert_eq!(state.card, card);
        assert_eq!(state.display, display);
        assert_eq!(state.view, ViewMode::Headless);
    }
}

#[test]
fn embedded_image_falls_back_to_prior_value() {
    let card = sample_card("data:image/png;base64,iVBORw0KGgo=");
    let display = DisplayOptions {
        style: CardStyle::Overlay,
        ratio: AspectRatio::Square,
    };
    let query = encode_query(&card, &display);
    assert!(!query.contains("imageUrl"));

    let state = HydratedState::from_query(&query);
    assert_eq!(state.card.image_url, CardData::default().image_url);
    assert_eq!(
        CardData {
            image_url: card.image_url.clone(),
            ..state.card.clone()
        },
        card
    );

    let mut prior = CardData::default();
    prior.image_url = "https://prior.example/img.png".into();
    let mut prior_display = DisplayOptions::default();
    hydrate(&query, &mut prior, &mut prior_display);
    assert_eq!(prior.image_url, "https://prior.example/img.png");
    assert_eq!(prior.title, card.title);
}

#[test]
fn invalid_style_and_ratio_keep_prior_values() {
    let mut card = CardData::default();
    let mut display = DisplayOptions {
        style: CardStyle::Glass,
        ratio: AspectRatio::Story,
    };
    let view = hydrate("title=Hi&style=neon&ratio=4%3A3", &mut card, &mut display);
    assert_eq!(view, ViewMode::Editor);
    assert_eq!(card.title, "Hi");
    assert_eq!(
        display,
        DisplayOptions {
            style: CardStyle::Glass,
            ratio: AspectRatio::Story,
        }
    );
}

#[test]
fn unrelated_parameters_leave_defaults() {
    for query in ["", "?", "utm_source=x&ref=y", "foo", "%%%&&==", "view=headless"] {
        let editor = Editor::from_query(query);
        assert_eq!(editor.card(), &CardData::default(), "query {:?}", query);
        assert_eq!(editor.display(), DisplayOptions::default(), "query {:?}", query);
    }
}

#[test]
fn headless_flag_is_read_at_startup() {
    assert!(Editor::from_query("view=headless&title=x").is_headless());
    assert!(!Editor::from_query("view=Headless").is_headless());
    assert!(!Editor::new().is_headless());
}

#[test]
fn editor_url_round_trips_through_full_url() {
    let mut editor = Editor::new();
    editor.set_style(CardStyle::Minimal);
    editor.set_ratio(AspectRatio::Story);
    editor.select_image("http://example.com/pic.png");
    let base = url::Url::parse("https://cards.example/app/").expect("base");

    let link = editor.headless_url(&base);
    assert_eq!(link.path(), "/app/");

    let restored = Editor::from_url(&link);
    assert!(restored.is_headless());
    assert_eq!(restored.card(), editor.card());
    assert_eq!(restored.display(), editor.display());
}
