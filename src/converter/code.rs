//! Fenced code blocks, rendered as a shaded single-cell table.

use crate::core::ast::{Alignment, TextRun};
use crate::core::document::{
    Border, CellBorders, DocNode, Paragraph, RgbColor, Spacing, Table, TableCell, TableRow,
};
use log::debug;

pub const CODE_BLOCK_FONT: &str = "Consolas";
/// Points.
pub const CODE_BLOCK_SIZE: f32 = 10.0;
pub const CODE_BLOCK_COLOR: &str = "333333";
pub const CODE_BLOCK_SHADING: &str = "F6F8FA";
/// Accent bar on the left edge (3pt).
pub const CODE_BLOCK_BAR: Border = Border::Single {
    size: 24,
    color: RgbColor(0x4A90E2),
};

/// Converter for fenced code blocks.
///
/// Code blocks never inherit the document style.
pub struct CodeBlockConverter;

impl CodeBlockConverter {
    pub fn convert(language: Option<&str>, lines: &[String]) -> DocNode {
        debug!(
            "code block: {} line(s), language {}",
            lines.len(),
            language.unwrap_or("none")
        );

        let mut paragraphs: Vec<Paragraph> = lines.iter().map(|line| Self::line(line)).collect();
        if paragraphs.is_empty() {
            paragraphs.push(Self::line(""));
        }

        DocNode::Table(Table {
            rows: vec![TableRow {
                cells: vec![TableCell {
                    paragraphs,
                    borders: CellBorders {
                        left: CODE_BLOCK_BAR,
                        ..CellBorders::none()
                    },
                    shading: Some(CODE_BLOCK_SHADING.to_string()),
                }],
                is_header: false,
            }],
            column_count: 1,
            alignment: None,
        })
    }

    fn line(text: &str) -> Paragraph {
        let para = Paragraph::new().align(Alignment::Left).spacing(Spacing {
            before: 0,
            after: 0,
            line: None,
        });
        if text.is_empty() {
            return para;
        }
        para.push_run(TextRun::plain(
            text,
            CODE_BLOCK_FONT,
            CODE_BLOCK_SIZE,
            CODE_BLOCK_COLOR,
        ))
    }
}
