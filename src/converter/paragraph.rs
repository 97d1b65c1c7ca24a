//! Paragraph-level emitters: headings, body paragraphs, blockquotes and
//! display math.

use super::run::{RunConverter, RunStyle};
use super::ConversionContext;
use crate::core::ast::{Alignment, InlineRun};
use crate::core::document::{DocNode, Indent, Paragraph, ParagraphChild, Spacing};
use crate::core::style::ParagraphSpacing;
use crate::core::units::{indent_chars_to_twips, line_multiplier_to_units, points_to_twips};

/// Left indent of blockquotes (0.5in).
pub const BLOCKQUOTE_INDENT: u32 = 720;
/// Muted text color used for blockquotes regardless of the body color.
pub const BLOCKQUOTE_COLOR: &str = "595959";
/// Background fill of blockquotes.
pub const BLOCKQUOTE_SHADING: &str = "F5F5F5";

/// Converter for single-line text blocks.
pub struct ParagraphConverter;

impl ParagraphConverter {
    /// Emits a heading; levels past 3 use the third heading style.
    pub fn heading(
        level: usize,
        content: &str,
        alignment: Option<Alignment>,
        context: &ConversionContext<'_>,
    ) -> DocNode {
        let style = context.style().heading(level);
        let run_style = RunStyle::new(&style.font_face, style.font_size, &style.color).bold(true);

        let para = Paragraph {
            children: Self::children(RunConverter::convert(content, &run_style)),
            ..Paragraph::new()
        }
        .heading(level)
        .align(alignment.unwrap_or(style.alignment))
        .spacing(Self::spacing(style.spacing, style.line_spacing));

        DocNode::Paragraph(para)
    }

    /// Emits a body paragraph with the configured first-line indent.
    ///
    /// The indent is dropped when the effective alignment is center or right.
    pub fn paragraph(
        content: &str,
        alignment: Option<Alignment>,
        context: &ConversionContext<'_>,
    ) -> DocNode {
        let body = &context.style().body;
        let alignment = alignment.unwrap_or(body.alignment);
        let run_style = RunStyle::new(&body.font_face, body.font_size, &body.text_color);

        let mut para = Paragraph {
            children: Self::children(RunConverter::convert(content, &run_style)),
            ..Paragraph::new()
        }
        .align(alignment)
        .spacing(Self::spacing(body.paragraph_spacing, body.line_spacing));

        if alignment.allows_first_line_indent() {
            let first_line = indent_chars_to_twips(body.first_line_indent);
            if first_line > 0 {
                para = para.indent(Indent {
                    left: 0,
                    first_line,
                });
            }
        }

        DocNode::Paragraph(para)
    }

    pub fn blockquote(
        content: &str,
        alignment: Option<Alignment>,
        context: &ConversionContext<'_>,
    ) -> DocNode {
        let body = &context.style().body;
        let run_style = RunStyle::new(&body.font_face, body.font_size, BLOCKQUOTE_COLOR);

        let para = Paragraph {
            children: Self::children(RunConverter::convert(content, &run_style)),
            ..Paragraph::new()
        }
        .align(alignment.unwrap_or(body.alignment))
        .spacing(Self::spacing(body.paragraph_spacing, body.line_spacing))
        .indent(Indent {
            left: BLOCKQUOTE_INDENT,
            first_line: 0,
        })
        .shading(BLOCKQUOTE_SHADING);

        DocNode::Paragraph(para)
    }

    /// Display formula, passed through untouched.
    pub fn math(latex: &str, context: &ConversionContext<'_>) -> DocNode {
        let body = &context.style().body;
        let para = Paragraph::new()
            .align(Alignment::Center)
            .spacing(Self::spacing(body.paragraph_spacing, 1.0))
            .push(ParagraphChild::Math(latex.to_string()));
        DocNode::Paragraph(para)
    }

    pub(crate) fn children(runs: Vec<InlineRun>) -> Vec<ParagraphChild> {
        runs.into_iter()
            .map(|run| match run {
                InlineRun::Text(text) => ParagraphChild::Run(text),
                InlineRun::Math(latex) => ParagraphChild::Math(latex),
            })
            .collect()
    }

    pub(crate) fn spacing(spacing: ParagraphSpacing, line_spacing: f32) -> Spacing {
        Spacing {
            before: points_to_twips(spacing.before),
            after: points_to_twips(spacing.after),
            line: Some(line_multiplier_to_units(line_spacing)),
        }
    }
}
