//! Block-level and inline AST produced from Markdown source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// First-line indent only applies to left-flowing text.
    pub fn allows_first_line_indent(self) -> bool {
        matches!(self, Alignment::Left | Alignment::Justify)
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" => Ok(Alignment::Justify),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        };
        f.write_str(name)
    }
}

/// One classified unit of Markdown source.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// ATX heading. `level` is the raw `#` count; styling demotes anything
    /// past 3 to the third heading style.
    Heading {
        level: usize,
        content: String,
        alignment: Option<Alignment>,
    },
    Image {
        alt: String,
        url: String,
    },
    CodeFence {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table(TableBlock),
    MathBlock {
        latex: String,
    },
    Blockquote {
        content: String,
        alignment: Option<Alignment>,
    },
    Paragraph {
        content: String,
        alignment: Option<Alignment>,
    },
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Image { .. } => "image",
            Block::CodeFence { .. } => "code",
            Block::Table(_) => "table",
            Block::MathBlock { .. } => "math",
            Block::Blockquote { .. } => "blockquote",
            Block::Paragraph { .. } => "paragraph",
        }
    }
}

/// Pipe table with the separator row already removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableBlock {
    /// First retained row; `None` when every row was a separator.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    /// 1-based position of this table among the document's tables.
    pub caption_index: usize,
}

impl TableBlock {
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

/// Styled text span.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: String,
    /// Size in points.
    pub size: f32,
    /// Hex RGB without `#`.
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    /// Background fill, hex RGB.
    pub shading: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>, font: &str, size: f32, color: &str) -> Self {
        Self {
            text: text.into(),
            font: font.to_string(),
            size,
            color: normalize_color(color),
            bold: false,
            italic: false,
            shading: None,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn shading(mut self, fill: &str) -> Self {
        self.shading = Some(normalize_color(fill));
        self
    }
}

/// Inline content of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineRun {
    Text(TextRun),
    Math(String),
}

impl InlineRun {
    /// Visible text with delimiters removed.
    pub fn text(&self) -> &str {
        match self {
            InlineRun::Text(run) => &run.text,
            InlineRun::Math(latex) => latex,
        }
    }
}

/// Strips a leading `#` and upper-cases hex colors.
pub fn normalize_color(color: &str) -> String {
    color.trim().trim_start_matches('#').to_ascii_uppercase()
}
