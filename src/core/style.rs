//! Resolved visual style model.

use super::ast::Alignment;
use crate::{error::Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Named style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleTemplate {
    #[default]
    Standard,
    Academic,
    Note,
    Custom,
}

impl FromStr for StyleTemplate {
    type Err = std::convert::Infallible;

    /// Unknown names resolve to [`StyleTemplate::Standard`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "academic" => StyleTemplate::Academic,
            "note" => StyleTemplate::Note,
            "custom" => StyleTemplate::Custom,
            _ => StyleTemplate::Standard,
        })
    }
}

/// Space before and after a paragraph, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphSpacing {
    pub before: f32,
    pub after: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyStyle {
    pub font_face: String,
    /// Points.
    pub font_size: f32,
    /// Multiple of single line height.
    pub line_spacing: f32,
    pub text_color: String,
    pub alignment: Alignment,
    pub paragraph_spacing: ParagraphSpacing,
    /// Measured in character widths.
    pub first_line_indent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStyle {
    pub font_face: String,
    pub font_size: f32,
    pub color: String,
    pub alignment: Alignment,
    pub line_spacing: f32,
    pub spacing: ParagraphSpacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    pub is_three_line_table: bool,
}

/// Every styling decision for one conversion run. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    pub body: BodyStyle,
    pub heading1: HeadingStyle,
    pub heading2: HeadingStyle,
    pub heading3: HeadingStyle,
    pub table: TableStyle,
}

impl DocumentStyle {
    /// Heading sub-style for an ATX level; levels past 3 share heading3.
    pub fn heading(&self, level: usize) -> &HeadingStyle {
        match level {
            0 | 1 => &self.heading1,
            2 => &self.heading2,
            _ => &self.heading3,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Style(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// General-purpose document: serif body, centered title.
    pub fn standard() -> Self {
        Self {
            body: BodyStyle {
                font_face: "宋体".into(),
                font_size: 12.0,
                line_spacing: 1.5,
                text_color: "000000".into(),
                alignment: Alignment::Justify,
                paragraph_spacing: ParagraphSpacing {
                    before: 0.0,
                    after: 6.0,
                },
                first_line_indent: 2.0,
            },
            heading1: heading("黑体", 22.0, "000000", Alignment::Center, 12.0, 12.0),
            heading2: heading("黑体", 16.0, "000000", Alignment::Left, 12.0, 6.0),
            heading3: heading("黑体", 14.0, "000000", Alignment::Left, 6.0, 6.0),
            table: TableStyle {
                is_three_line_table: false,
            },
        }
    }

    /// Paper layout with three-line tables.
    pub fn academic() -> Self {
        Self {
            body: BodyStyle {
                font_face: "Times New Roman".into(),
                font_size: 12.0,
                line_spacing: 1.5,
                text_color: "000000".into(),
                alignment: Alignment::Justify,
                paragraph_spacing: ParagraphSpacing {
                    before: 0.0,
                    after: 0.0,
                },
                first_line_indent: 2.0,
            },
            heading1: heading("黑体", 16.0, "000000", Alignment::Center, 24.0, 18.0),
            heading2: heading("黑体", 14.0, "000000", Alignment::Left, 12.0, 6.0),
            heading3: heading("黑体", 12.0, "000000", Alignment::Left, 6.0, 6.0),
            table: TableStyle {
                is_three_line_table: true,
            },
        }
    }

    /// Lighter sans-serif layout for notes.
    pub fn note() -> Self {
        Self {
            body: BodyStyle {
                font_face: "微软雅黑".into(),
                font_size: 11.0,
                line_spacing: 1.3,
                text_color: "333333".into(),
                alignment: Alignment::Left,
                paragraph_spacing: ParagraphSpacing {
                    before: 0.0,
                    after: 8.0,
                },
                first_line_indent: 0.0,
            },
            heading1: heading("微软雅黑", 20.0, "2E74B5", Alignment::Left, 18.0, 10.0),
            heading2: heading("微软雅黑", 15.0, "2E74B5", Alignment::Left, 12.0, 6.0),
            heading3: heading("微软雅黑", 13.0, "1F4E79", Alignment::Left, 8.0, 4.0),
            table: TableStyle {
                is_three_line_table: false,
            },
        }
    }
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self::standard()
    }
}

fn heading(
    font_face: &str,
    font_size: f32,
    color: &str,
    alignment: Alignment,
    before: f32,
    after: f32,
) -> HeadingStyle {
    HeadingStyle {
        font_face: font_face.into(),
        font_size,
        color: color.into(),
        alignment,
        line_spacing: 1.2,
        spacing: ParagraphSpacing { before, after },
    }
}
