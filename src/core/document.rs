//! Word-native node model emitted by the converter and consumed by the renderer.
//!
//! Lengths are already in document units: spacing and indents in twips,
//! line spacing in 240ths of a line, border widths in eighths of a point,
//! image extents in pixels.

use super::ast::{normalize_color, Alignment, TextRun};

/// A converted document ready for serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Written to the package's core properties.
    pub title: Option<String>,
    pub nodes: Vec<DocNode>,
}

impl Document {
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(DocNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A top-level body element.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Paragraph(Paragraph),
    Table(Table),
}

impl DocNode {
    /// Visible text, cells separated by tabs and paragraphs by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            DocNode::Paragraph(p) => p.plain_text(),
            DocNode::Table(t) => t
                .rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| {
                            cell.paragraphs
                                .iter()
                                .map(Paragraph::plain_text)
                                .collect::<Vec<_>>()
                                .join("\n")
                        })
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            DocNode::Paragraph(p) => Some(p),
            DocNode::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DocNode::Table(t) => Some(t),
            DocNode::Paragraph(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
    /// `None` keeps single spacing.
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indent {
    pub left: u32,
    pub first_line: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    /// Outline level 1..=3, mapped to the `HeadingN` paragraph style.
    pub heading_level: Option<usize>,
    pub spacing: Option<Spacing>,
    pub indent: Option<Indent>,
    pub shading: Option<String>,
    pub children: Vec<ParagraphChild>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn heading(mut self, level: usize) -> Self {
        self.heading_level = Some(level.clamp(1, 3));
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn shading(mut self, fill: &str) -> Self {
        self.shading = Some(normalize_color(fill));
        self
    }

    pub fn push(mut self, child: ParagraphChild) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_run(self, run: TextRun) -> Self {
        self.push(ParagraphChild::Run(run))
    }

    pub fn first_line_indent(&self) -> u32 {
        self.indent.map(|i| i.first_line).unwrap_or(0)
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.children.iter().filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
    }

    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                ParagraphChild::Run(run) => text.push_str(&run.text),
                ParagraphChild::Math(latex) => text.push_str(latex),
                ParagraphChild::Image(_) => {}
            }
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphChild {
    Run(TextRun),
    /// Raw formula source wrapped in an Office Math element.
    Math(String),
    Image(ImageRun),
}

/// An embedded picture, sized in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRun {
    pub data: Vec<u8>,
    /// File extension of the media part, e.g. `png`.
    pub extension: String,
    pub width: u32,
    pub height: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    None,
    Single {
        /// Eighths of a point.
        size: u32,
        color: RgbColor,
    },
}

impl Border {
    pub fn single(size: u32, color: RgbColor) -> Self {
        Border::Single { size, color }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Border::Single { .. })
    }

    pub fn size(&self) -> u32 {
        match self {
            Border::None => 0,
            Border::Single { size, .. } => *size,
        }
    }
}

/// 24-bit color, rendered as `RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbColor(pub u32);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0x000000);

    pub fn hex(&self) -> String {
        format!("{:06X}", self.0 & 0xFF_FFFF)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellBorders {
    pub top: Border,
    pub bottom: Border,
    pub left: Border,
    pub right: Border,
}

impl CellBorders {
    pub fn uniform(border: Border) -> Self {
        Self {
            top: border,
            bottom: border,
            left: border,
            right: border,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    pub borders: CellBorders,
    pub shading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    /// Repeat this row at the top of each page.
    pub is_header: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub column_count: usize,
    pub alignment: Option<Alignment>,
}

impl Table {
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }
}
