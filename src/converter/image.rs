//! Image resolver and emitter - loads referenced images and fits them to the
//! page content width.

use super::ConversionContext;
use crate::core::ast::{Alignment, TextRun};
use crate::core::document::{DocNode, ImageRun, Paragraph, ParagraphChild, Spacing};
use crate::{error::Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, ImageReader};
use log::{debug, warn};
use std::future::Future;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Size used when the bytes cannot be decoded.
pub const FALLBACK_IMAGE_SIZE: (u32, u32) = (400, 300);
/// Text color of the placeholder written for images that fail to load.
pub const PLACEHOLDER_COLOR: &str = "FF0000";
const CAPTION_COLOR: &str = "666666";

/// Source of image bytes.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Loads `data:` URIs, `http(s)://` URLs and local paths.
pub struct DefaultImageFetcher {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl DefaultImageFetcher {
    /// `timeout` of `None` waits on each request indefinitely.
    pub fn new(base_dir: Option<PathBuf>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Conversion(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_dir })
    }

    fn local_path(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::image_fetch(url, e))?;
        if !response.status().is_success() {
            return Err(Error::image_fetch(
                url,
                format!("HTTP {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::image_fetch(url, e))?;
        Ok(bytes.to_vec())
    }
}

impl ImageFetcher for DefaultImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("data:") {
            return decode_data_uri(url);
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url).await;
        }
        let path = self.local_path(url);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::image_fetch(url, e))
    }
}

/// Decodes `data:[<mime>][;base64],<payload>`.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::image_fetch(uri, "not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::image_fetch(uri, "data URI has no payload"))?;

    if meta.ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64
            .decode(compact.as_bytes())
            .map_err(|e| Error::image_fetch(uri, e))
    } else {
        percent_decode(payload)
            .ok_or_else(|| Error::image_fetch(uri, "invalid percent-encoding"))
    }
}

/// Decodes `%XX` escapes; `None` on a truncated or non-hex escape.
fn percent_decode(payload: &str) -> Option<Vec<u8>> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = char::from(*bytes.get(i + 1)?).to_digit(16)?;
            let low = char::from(*bytes.get(i + 2)?).to_digit(16)?;
            out.push((high * 16 + low) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

/// A loaded image with its natural and display sizes in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub data: Vec<u8>,
    pub extension: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub width: u32,
    pub height: u32,
}

/// Fits images to a maximum width, preserving aspect ratio.
pub fn scale_to_fit(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width == 0 || width <= max_width {
        return (width, height);
    }
    let ratio = f64::from(max_width) / f64::from(width);
    (max_width, (f64::from(height) * ratio).round() as u32)
}

/// Fetches and measures images one at a time.
pub struct ImageResolver<'a, F> {
    fetcher: &'a F,
    max_width: u32,
}

impl<'a, F: ImageFetcher> ImageResolver<'a, F> {
    pub fn new(fetcher: &'a F, max_width: u32) -> Self {
        Self { fetcher, max_width }
    }

    pub async fn resolve(&self, url: &str) -> Result<ResolvedImage> {
        let data = self.fetcher.fetch(url).await?;
        if data.is_empty() {
            return Err(Error::image_fetch(url, "empty response"));
        }

        let extension = sniff_extension(&data)
            .ok_or_else(|| Error::image_fetch(url, "unrecognized image format"))?;
        let (natural_width, natural_height) = measure(&data).unwrap_or_else(|| {
            warn!(
                "could not decode image '{}'; using {}x{}",
                url, FALLBACK_IMAGE_SIZE.0, FALLBACK_IMAGE_SIZE.1
            );
            FALLBACK_IMAGE_SIZE
        });
        let (width, height) = scale_to_fit(natural_width, natural_height, self.max_width);
        debug!(
            "image '{}': {}x{} -> {}x{}",
            url, natural_width, natural_height, width, height
        );

        Ok(ResolvedImage {
            data,
            extension: extension.to_string(),
            natural_width,
            natural_height,
            width,
            height,
        })
    }
}

fn measure(data: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok((w, h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    }
}

/// Media extension for formats a word processor can embed.
fn sniff_extension(data: &[u8]) -> Option<&'static str> {
    match image::guess_format(data).ok()? {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpeg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::Bmp => Some("bmp"),
        ImageFormat::WebP => Some("webp"),
        ImageFormat::Tiff => Some("tiff"),
        _ => None,
    }
}

/// Emitter for image blocks.
pub struct ImageConverter;

impl ImageConverter {
    /// Emits the picture with an alt-text caption, or a red placeholder when
    /// the image cannot be loaded. Never fails the conversion.
    pub async fn convert<F: ImageFetcher>(
        alt: &str,
        url: &str,
        resolver: &ImageResolver<'_, F>,
        context: &mut ConversionContext<'_>,
    ) -> Vec<DocNode> {
        match resolver.resolve(url).await {
            Ok(image) => {
                context.record_image(true);
                Self::picture(alt, image, context)
            }
            Err(e) => {
                warn!("{}", e);
                context.record_image(false);
                vec![Self::placeholder(alt, context)]
            }
        }
    }

    fn picture(alt: &str, image: ResolvedImage, context: &ConversionContext<'_>) -> Vec<DocNode> {
        let mut nodes = vec![DocNode::Paragraph(
            Paragraph::new()
                .align(Alignment::Center)
                .push(ParagraphChild::Image(ImageRun {
                    data: image.data,
                    extension: image.extension,
                    width: image.width,
                    height: image.height,
                    description: alt.to_string(),
                })),
        )];

        if !alt.is_empty() {
            let body = &context.style().body;
            nodes.push(DocNode::Paragraph(
                Paragraph::new()
                    .align(Alignment::Center)
                    .spacing(Spacing {
                        before: 0,
                        after: 120,
                        line: None,
                    })
                    .push_run(TextRun::plain(
                        alt,
                        &body.font_face,
                        (body.font_size - 1.5).max(1.0),
                        CAPTION_COLOR,
                    )),
            ));
        }

        nodes
    }

    fn placeholder(alt: &str, context: &ConversionContext<'_>) -> DocNode {
        let body = &context.style().body;
        DocNode::Paragraph(Paragraph::new().align(Alignment::Center).push_run(
            TextRun::plain(
                context.localization().image_unavailable(alt),
                &body.font_face,
                body.font_size,
                PLACEHOLDER_COLOR,
            ),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::style::DocumentStyle;
    use crate::localization::DefaultLocalization;
    use std::collections::HashMap;

    /// Serves canned bytes; unknown URLs fail.
    #[derive(Default)]
    pub(crate) struct MemoryFetcher {
        pub(crate) images: HashMap<String, Vec<u8>>,
    }

    impl ImageFetcher for MemoryFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.images
                .get(url)
                .cloned()
                .ok_or_else(|| Error::image_fetch(url, "not found"))
        }
    }

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode png");
        buf
    }

    #[test]
    fn test_scale_to_fit() {
        assert_eq!(scale_to_fit(300, 200, 550), (300, 200));
        assert_eq!(scale_to_fit(550, 200, 550), (550, 200));
        assert_eq!(scale_to_fit(1100, 401, 550), (550, 201));
        assert_eq!(scale_to_fit(1000, 333, 550), (550, 183));
    }

    #[test]
    fn test_data_uri_decoding() {
        assert_eq!(
            decode_data_uri("data:image/png;base64,AQID").expect("decode"),
            vec![1, 2, 3]
        );
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_plain_data_uri_is_percent_decoded() {
        assert_eq!(
            decode_data_uri("data:image/svg+xml,%3Csvg%2F%3E").expect("decode"),
            b"<svg/>".to_vec()
        );
        assert_eq!(
            decode_data_uri("data:,a%20b").expect("decode"),
            b"a b".to_vec()
        );
        assert!(decode_data_uri("data:,bad%2").is_err());
        assert!(decode_data_uri("data:,bad%zz").is_err());
    }

    #[tokio::test]
    async fn test_resolver_scales_wide_images() {
        let mut fetcher = MemoryFetcher::default();
        fetcher.images.insert("wide.png".into(), png(1100, 200));
        let resolver = ImageResolver::new(&fetcher, 550);

        let image = resolver.resolve("wide.png").await.expect("resolve");
        assert_eq!((image.natural_width, image.natural_height), (1100, 200));
        assert_eq!((image.width, image.height), (550, 100));
        assert_eq!(image.extension, "png");
    }

    #[tokio::test]
    async fn test_truncated_png_uses_fallback_size() {
        let mut fetcher = MemoryFetcher::default();
        let mut truncated = b"\x89PNG\r\n\x1a\n".to_vec();
        truncated.extend_from_slice(b"not a chunk");
        fetcher.images.insert("broken.png".into(), truncated);
        let resolver = ImageResolver::new(&fetcher, 550);

        let image = resolver.resolve("broken.png").await.expect("resolve");
        assert_eq!(image.extension, "png");
        assert_eq!((image.width, image.height), FALLBACK_IMAGE_SIZE);
    }

    #[tokio::test]
    async fn test_unrecognized_formats_are_rejected() {
        let mut fetcher = MemoryFetcher::default();
        fetcher.images.insert(
            "logo.svg".into(),
            br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#.to_vec(),
        );
        fetcher
            .images
            .insert("page.html".into(), b"<!DOCTYPE html><p>404</p>".to_vec());
        fetcher.images.insert("junk".into(), b"not an image".to_vec());
        let resolver = ImageResolver::new(&fetcher, 550);

        for url in ["logo.svg", "page.html", "junk"] {
            assert!(
                matches!(resolver.resolve(url).await, Err(Error::ImageFetch { .. })),
                "{url}"
            );
        }
    }

    #[tokio::test]
    async fn test_svg_becomes_placeholder() {
        let mut fetcher = MemoryFetcher::default();
        fetcher.images.insert("logo.svg".into(), b"<svg/>".to_vec());
        let resolver = ImageResolver::new(&fetcher, 550);
        let style = DocumentStyle::standard();
        let mut context = ConversionContext::new(&style, &DefaultLocalization);

        let nodes = ImageConverter::convert("Logo", "logo.svg", &resolver, &mut context).await;
        assert_eq!(nodes.len(), 1);
        let para = nodes[0].as_paragraph().expect("placeholder paragraph");
        assert!(para.text_runs().all(|r| r.color == PLACEHOLDER_COLOR));
        assert_eq!(context.stats().failed_images, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_becomes_placeholder() {
        let fetcher = MemoryFetcher::default();
        let resolver = ImageResolver::new(&fetcher, 550);
        let style = DocumentStyle::standard();
        let mut context = ConversionContext::new(&style, &DefaultLocalization);

        let nodes = ImageConverter::convert("Diagram", "missing.png", &resolver, &mut context).await;
        assert_eq!(nodes.len(), 1);
        let para = nodes[0].as_paragraph().expect("placeholder paragraph");
        assert_eq!(para.alignment, Some(Alignment::Center));
        assert!(para.plain_text().contains("Diagram"));
        assert!(para.text_runs().all(|r| r.color == PLACEHOLDER_COLOR));
        assert_eq!(context.stats().failed_images, 1);
    }

    #[tokio::test]
    async fn test_loaded_image_gets_caption() {
        let mut fetcher = MemoryFetcher::default();
        fetcher.images.insert("a.png".into(), png(10, 20));
        let resolver = ImageResolver::new(&fetcher, 550);
        let style = DocumentStyle::standard();
        let mut context = ConversionContext::new(&style, &DefaultLocalization);

        let nodes = ImageConverter::convert("Figure A", "a.png", &resolver, &mut context).await;
        assert_eq!(nodes.len(), 2);
        let picture = nodes[0].as_paragraph().expect("picture");
        assert!(matches!(
            picture.children.as_slice(),
            [ParagraphChild::Image(ImageRun { width: 10, height: 20, .. })]
        ));
        assert_eq!(nodes[1].plain_text(), "Figure A");
        assert_eq!(context.stats().images, 1);
    }

    #[tokio::test]
    async fn test_default_fetcher_reads_data_uri_and_files() {
        let fetcher = DefaultImageFetcher::new(Some(std::env::temp_dir()), None).expect("client");
        let bytes = fetcher
            .fetch("data:image/png;base64,AQID")
            .await
            .expect("data uri");
        assert_eq!(bytes, vec![1, 2, 3]);

        let name = format!("md2docx_fetch_{}.bin", std::process::id());
        let path = std::env::temp_dir().join(&name);
        std::fs::write(&path, [9u8, 8, 7]).expect("write temp file");
        let bytes = fetcher.fetch(&name).await.expect("relative file");
        let _ = std::fs::remove_file(&path);
        assert_eq!(bytes, vec![9, 8, 7]);

        assert!(fetcher.fetch("does/not/exist.png").await.is_err());
    }
}
