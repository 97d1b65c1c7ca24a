mod classifier;
mod extractor;

use crate::core::ast::Block;

/// Splits source text into an ordered sequence of blocks.
pub trait BlockExtractor {
    fn extract(&self, source: &str) -> Vec<Block>;
}

pub use classifier::{classify_at, strip_alignment_marker, Classified};
pub use extractor::MarkdownExtractor;
