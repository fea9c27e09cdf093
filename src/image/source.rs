use std::time::Duration;

use image::DynamicImage;
use log::debug;
use reqwest::blocking::Client;

use crate::card::{decode_data_uri, is_remote_image};
use crate::error::{RenderError, SourceError};

/// Resolves image references (data URIs or remote URLs) into decoded images.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    client: Option<Client>,
}

impl SourceLoader {
    /// Loader that only decodes embedded data URIs.
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Loader that also fetches `http(s)` references.
    pub fn with_remote(timeout: Duration) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RenderError::Client)?;
        Ok(Self {
            client: Some(client),
        })
    }

    pub fn fetches_remote(&self) -> bool {
        self.client.is_some()
    }

    pub fn load(&self, source: &str) -> Result<DynamicImage, SourceError> {
        if is_remote_image(source) {
            let client = self
                .client
                .as_ref()
                .ok_or_else(|| SourceError::RemoteDisabled(source.to_string()))?;
            debug!("fetching image {}", source);
            let bytes = client
                .get(source)
                .send()
                .and_then(|res| res.error_for_status())
                .and_then(|res| res.bytes())
                .map_err(|source_err| SourceError::Fetch {
                    url: source.to_string(),
                    source: source_err,
                })?;
            return Ok(image::load_from_memory(&bytes)?);
        }
        let (_, bytes) = decode_data_uri(source).ok_or(SourceError::InvalidDataUri)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::encode_data_uri;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode");
        out.into_inner()
    }

    #[test]
    fn decodes_embedded_images() {
        let uri = encode_data_uri("image/png", &tiny_png());
        let img = SourceLoader::offline().load(&uri).expect("decode");
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn offline_loader_refuses_remote() {
        let err = SourceLoader::offline()
            .load("https://example.com/a.png")
            .unwrap_err();
        assert!(matches!(err, SourceError::RemoteDisabled(_)));
    }

    #[test]
    fn garbage_is_reported() {
        let loader = SourceLoader::offline();
        assert!(matches!(loader.load("not an image"), Err(SourceError::InvalidDataUri)));
        let uri = encode_data_uri("image/png", b"nope");
        assert!(matches!(loader.load(&uri), Err(SourceError::Decode(_))));
    }
}
