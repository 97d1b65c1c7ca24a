//! Inline span parser - splits one line into styled runs.

use crate::core::ast::{normalize_color, InlineRun, TextRun};
use once_cell::sync::Lazy;
use regex::Regex;

/// Font used for inline code spans.
pub const CODE_FONT: &str = "Consolas";
/// Accent color of inline code spans.
pub const CODE_COLOR: &str = "C7254E";
/// Background fill behind inline code spans.
pub const CODE_SHADING: &str = "F3F4F4";

// Longest delimiters first so `**` is never read as two `*`.
static INLINE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|__(.+?)__|\*(.+?)\*|_(.+?)_|`(.+?)`|\$(.+?)\$",
    )
    .expect("valid inline span regex")
});

/// Ambient formatting that unstyled text inherits.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    pub font: String,
    pub size: f32,
    pub color: String,
    pub bold: bool,
}

impl RunStyle {
    pub fn new(font: &str, size: f32, color: &str) -> Self {
        Self {
            font: font.to_string(),
            size,
            color: normalize_color(color),
            bold: false,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    fn text(&self, text: &str) -> TextRun {
        TextRun::plain(text, &self.font, self.size, &self.color).bold(self.bold)
    }
}

/// Converter for inline Markdown spans.
pub struct RunConverter;

impl RunConverter {
    /// Tokenizes bold, italic, bold-italic, code and math spans.
    ///
    /// Spans do not nest; the text between and after matches becomes plain
    /// runs, so the run texts concatenate back to the line minus delimiters.
    pub fn convert(text: &str, style: &RunStyle) -> Vec<InlineRun> {
        let mut runs = Vec::new();
        let mut last = 0;

        for caps in INLINE_SPAN.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                runs.push(InlineRun::Text(style.text(&text[last..whole.start()])));
            }

            let run = if let Some(inner) = caps.get(1) {
                InlineRun::Text(style.text(inner.as_str()).bold(true).italic(true))
            } else if let Some(inner) = caps.get(2).or_else(|| caps.get(3)) {
                InlineRun::Text(style.text(inner.as_str()).bold(true))
            } else if let Some(inner) = caps.get(4).or_else(|| caps.get(5)) {
                InlineRun::Text(style.text(inner.as_str()).italic(true))
            } else if let Some(inner) = caps.get(6) {
                InlineRun::Text(
                    TextRun::plain(inner.as_str(), CODE_FONT, style.size, CODE_COLOR)
                        .bold(style.bold)
                        .shading(CODE_SHADING),
                )
            } else if let Some(inner) = caps.get(7) {
                InlineRun::Math(inner.as_str().to_string())
            } else {
                InlineRun::Text(style.text(whole.as_str()))
            };
            runs.push(run);
            last = whole.end();
        }

        if last < text.len() {
            runs.push(InlineRun::Text(style.text(&text[last..])));
        }

        runs
    }
}
