//! Node.js screenshot script for driving the headless view from a CI job or
//! a workflow runner.

use url::Url;

use crate::card::{CardData, DisplayOptions, is_remote_image};
use crate::hydrate::HEADLESS_VIEW;

/// Public image used in the script when the card's image cannot travel in a URL.
pub const SAMPLE_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1535378437327-b71013b86852?auto=format&fit=crop&w=1000&q=80";

/// Puppeteer script that opens the headless view of `base` and screenshots the card.
pub fn puppeteer_recipe(base: &Url, card: &CardData, display: &DisplayOptions) -> String {
    let image_url = if is_remote_image(&card.image_url) {
        card.image_url.as_str()
    } else {
        SAMPLE_IMAGE_URL
    };
    let subtitle = card.subtitle.replace('\n', " ");
    let mut origin = base.clone();
    origin.set_query(None);
    origin.set_fragment(None);

    format!(
        r#"const puppeteer = require('puppeteer');

async function generateSocialCard() {{
  const browser = await puppeteer.launch();
  const page = await browser.newPage();

  const config = {{
    title: {title},
    subtitle: {subtitle},
    author: {author},
    footerText: {footer},
    style: {style},
    ratio: {ratio},
    view: {view}, // renders the card surface only
    imageUrl: {image},
  }};

  const baseUrl = {base};
  const params = new URLSearchParams(config).toString();
  const targetUrl = `${{baseUrl}}?${{params}}`;

  console.log("Generating card from:", targetUrl);

  await page.setViewport({{ width: 450, height: 800, deviceScaleFactor: 2 }});
  await page.goto(targetUrl, {{ waitUntil: 'networkidle0' }});
  await page.screenshot({{ path: 'social-card.png', omitBackground: true }});

  console.log("Card saved to social-card.png");
  await browser.close();
}}

generateSocialCard().catch(console.error);
"#,
        title = js_string(&card.title),
        subtitle = js_string(&subtitle),
        author = js_string(&card.author),
        footer = js_string(&card.footer_text),
        style = js_string(display.style.as_str()),
        ratio = js_string(display.ratio.as_str()),
        view = js_string(HEADLESS_VIEW),
        image = js_string(image_url),
        base = js_string(origin.as_str()),
    )
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
