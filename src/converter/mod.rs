//! Converter modules for Markdown to DOCX transformation.

mod code;
mod context;
mod image;
mod paragraph;
mod run;
mod styles;
mod table;

use crate::adapters::markdown::{BlockExtractor, MarkdownExtractor};
use crate::core::ast::Block;
use crate::core::document::{DocNode, Document};
use crate::core::style::DocumentStyle;
use crate::render::{DocxRenderer, Renderer};
use crate::{ConvertOptions, Result};
use log::info;
use std::path::Path;

pub use self::code::CodeBlockConverter;
pub use self::context::{ConversionContext, ConversionStats};
pub use self::image::{
    decode_data_uri, scale_to_fit, DefaultImageFetcher, ImageConverter, ImageFetcher,
    ImageResolver, ResolvedImage, FALLBACK_IMAGE_SIZE,
};
pub use self::paragraph::ParagraphConverter;
pub use self::run::{RunConverter, RunStyle};
pub use self::styles::StyleResolver;
pub use self::table::TableConverter;

/// Main converter struct that orchestrates Markdown to DOCX conversion.
pub struct MarkdownToDocx<F = DefaultImageFetcher> {
    options: ConvertOptions,
    fetcher: F,
}

impl MarkdownToDocx<DefaultImageFetcher> {
    /// Creates a converter that loads images from the network, data URIs
    /// and the filesystem.
    pub fn new(options: ConvertOptions) -> Result<Self> {
        let fetcher = DefaultImageFetcher::new(options.base_dir.clone(), options.image_timeout)?;
        Ok(Self { options, fetcher })
    }

    /// Creates a new converter with default options.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ConvertOptions::default())
    }
}

impl<F: ImageFetcher> MarkdownToDocx<F> {
    /// Creates a converter with a caller-supplied image source.
    pub fn with_fetcher(options: ConvertOptions, fetcher: F) -> Self {
        Self { options, fetcher }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The style every emitter of a run will read.
    pub fn resolve_style(&self) -> DocumentStyle {
        StyleResolver::resolve(self.options.template, self.options.custom_style.as_ref())
    }

    /// Parses Markdown and emits document nodes in source order.
    ///
    /// Images are fetched one at a time in document order.
    pub async fn build_document(&self, markdown: &str) -> Document {
        let style = self.resolve_style();
        let max_width = self.options.max_image_width;
        let mut context = ConversionContext::new(&style, self.options.language.localization());
        let resolver = ImageResolver::new(&self.fetcher, max_width);

        let mut nodes = Vec::new();
        for block in MarkdownExtractor.extract(markdown) {
            context.record_block();
            nodes.extend(Self::emit(block, &resolver, &mut context).await);
        }

        let stats = context.stats();
        info!(
            "converted {} block(s): {} table(s), {} image(s), {} failed image(s)",
            stats.blocks, stats.tables, stats.images, stats.failed_images
        );

        let title = nodes.iter().find_map(|node| match node {
            DocNode::Paragraph(p) if p.heading_level.is_some() => Some(p.plain_text()),
            _ => None,
        });

        Document { title, nodes }
    }

    /// Converts Markdown to the bytes of a `.docx` package.
    pub async fn convert(&self, markdown: &str) -> Result<Vec<u8>> {
        let document = self.build_document(markdown).await;
        DocxRenderer.render(&document)
    }

    /// Converts a Markdown file. The output file is only written on success.
    pub async fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<()> {
        let markdown = tokio::fs::read_to_string(input.as_ref()).await?;
        let bytes = self.convert(&markdown).await?;
        tokio::fs::write(output.as_ref(), bytes).await?;
        Ok(())
    }

    async fn emit(
        block: Block,
        resolver: &ImageResolver<'_, F>,
        context: &mut ConversionContext<'_>,
    ) -> Vec<DocNode> {
        match block {
            Block::Heading {
                level,
                content,
                alignment,
            } => vec![ParagraphConverter::heading(level, &content, alignment, context)],
            Block::Paragraph { content, alignment } => {
                vec![ParagraphConverter::paragraph(&content, alignment, context)]
            }
            Block::Blockquote { content, alignment } => {
                vec![ParagraphConverter::blockquote(&content, alignment, context)]
            }
            Block::MathBlock { latex } => vec![ParagraphConverter::math(&latex, context)],
            Block::CodeFence { language, lines } => {
                vec![CodeBlockConverter::convert(language.as_deref(), &lines)]
            }
            Block::Table(table) => TableConverter::convert(&table, context),
            Block::Image { alt, url } => ImageConverter::convert(&alt, &url, resolver, context).await,
        }
    }
}
