use super::{classify_at, BlockExtractor, Classified};
use crate::core::ast::Block;
use log::debug;

/// Single forward pass over Markdown lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExtractor;

impl BlockExtractor for MarkdownExtractor {
    fn extract(&self, source: &str) -> Vec<Block> {
        let lines: Vec<&str> = source.lines().collect();
        let mut blocks = Vec::new();
        let mut tables_seen = 0;
        let mut index = 0;

        while index < lines.len() {
            let Classified { block, consumed } = classify_at(&lines, index);
            if let Some(mut block) = block {
                if let Block::Table(table) = &mut block {
                    tables_seen += 1;
                    table.caption_index = tables_seen;
                }
                debug!(
                    "line {}: {} block spanning {} line(s)",
                    index + 1,
                    block.kind(),
                    consumed
                );
                blocks.push(block);
            }
            index += consumed.max(1);
        }

        blocks
    }
}
