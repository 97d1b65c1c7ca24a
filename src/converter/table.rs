//! Table converter - emits a caption paragraph plus a bordered table.

use super::paragraph::ParagraphConverter;
use super::run::{RunConverter, RunStyle};
use super::ConversionContext;
use crate::core::ast::{Alignment, TableBlock, TextRun};
use crate::core::document::{
    Border, CellBorders, DocNode, Paragraph, RgbColor, Spacing, Table, TableCell, TableRow,
};
use crate::core::units::points_to_twips;

/// Heavy rule of a three-line table (1.5pt).
pub const THICK_RULE: u32 = 12;
/// Thin rule under the header row, also used for grid tables (0.5pt).
pub const THIN_RULE: u32 = 4;

/// Converter for pipe tables.
pub struct TableConverter;

impl TableConverter {
    /// Emits `[caption, table]`.
    pub fn convert(table: &TableBlock, context: &mut ConversionContext<'_>) -> Vec<DocNode> {
        context.record_table();
        let caption = Self::caption(table.caption_index, context);

        let three_line = context.style().table.is_three_line_table;
        let column_count = table.column_count();
        let row_count = table.row_count();

        let body = &context.style().body;
        let cell_style = RunStyle::new(&body.font_face, body.font_size, &body.text_color);
        let mut rows = Vec::with_capacity(row_count);

        if let Some(header) = &table.header {
            let cells = pad(header, column_count)
                .map(|text| {
                    Paragraph::new()
                        .align(Alignment::Center)
                        .push_run(
                            TextRun::plain(
                                text,
                                &cell_style.font,
                                cell_style.size,
                                &cell_style.color,
                            )
                            .bold(true),
                        )
                })
                .collect::<Vec<_>>();
            rows.push(Self::row(cells, 0, row_count, three_line, true));
        }

        let offset = rows.len();
        for (idx, row) in table.rows.iter().enumerate() {
            let cells = pad(row, column_count)
                .map(|text| Paragraph {
                    children: ParagraphConverter::children(RunConverter::convert(
                        text,
                        &cell_style,
                    )),
                    ..Paragraph::new().align(Alignment::Center)
                })
                .collect::<Vec<_>>();
            rows.push(Self::row(cells, offset + idx, row_count, three_line, false));
        }

        vec![
            caption,
            DocNode::Table(Table {
                rows,
                column_count,
                alignment: Some(Alignment::Center),
            }),
        ]
    }

    /// Border scheme for one cell edge set.
    ///
    /// Three-line mode keeps only a heavy rule above the first row, a thin rule
    /// below it and a heavy rule below the last row. Grid mode draws every edge.
    pub fn cell_borders(row: usize, row_count: usize, three_line: bool) -> CellBorders {
        if !three_line {
            return CellBorders::uniform(Border::single(THIN_RULE, RgbColor::BLACK));
        }

        let last = row_count.saturating_sub(1);
        let top = if row == 0 {
            Border::single(THICK_RULE, RgbColor::BLACK)
        } else {
            Border::None
        };
        let bottom = if row == last {
            Border::single(THICK_RULE, RgbColor::BLACK)
        } else if row == 0 {
            Border::single(THIN_RULE, RgbColor::BLACK)
        } else {
            Border::None
        };

        CellBorders {
            top,
            bottom,
            left: Border::None,
            right: Border::None,
        }
    }

    fn caption(index: usize, context: &ConversionContext<'_>) -> DocNode {
        let body = &context.style().body;
        DocNode::Paragraph(
            Paragraph::new()
                .align(Alignment::Center)
                .spacing(Spacing {
                    before: points_to_twips(6.0),
                    after: points_to_twips(3.0),
                    line: None,
                })
                .push_run(
                    TextRun::plain(
                        context.localization().table_caption(index),
                        &body.font_face,
                        body.font_size,
                        &body.text_color,
                    )
                    .bold(true),
                ),
        )
    }

    fn row(
        paragraphs: Vec<Paragraph>,
        index: usize,
        row_count: usize,
        three_line: bool,
        is_header: bool,
    ) -> TableRow {
        let borders = Self::cell_borders(index, row_count, three_line);
        TableRow {
            cells: paragraphs
                .into_iter()
                .map(|para| TableCell {
                    paragraphs: vec![para],
                    borders,
                    shading: None,
                })
                .collect(),
            is_header,
        }
    }
}

fn pad(cells: &[String], width: usize) -> impl Iterator<Item = &str> {
    (0..width).map(move |i| cells.get(i).map(String::as_str).unwrap_or(""))
}
