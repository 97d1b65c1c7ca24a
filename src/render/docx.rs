//! Builds the `docx_rust` document model from the converted node tree.

use super::escape::strip_forbidden;
use super::package::{self, MediaPart};
use super::splice::{self, element_xml, Splices, DOCUMENT_PART};
use super::Renderer;
use crate::core::ast::{Alignment, TextRun};
use crate::core::document::{self as model, Border, DocNode, Document, ImageRun, ParagraphChild};
use crate::core::units::{pixels_to_emu, points_to_half_points};
use crate::{Error, Result};
use docx_rust::document::{
    AvList, Blip, BlipFill, Break, CNvPicPr, CNvPr, DocPr, Drawing, Ext, Extent, FillRect,
    Graphic, GraphicData, Inline, NvPicPr, Offset, Paragraph, Picture, PrstGeom, Run, RunContent,
    SpPr, Stretch, Tab, Table, TableCell, TableCellContent, TableGrid, TableRow, TextSpace, Xfrm,
};
use docx_rust::formatting::{
    Bold, BoldComplex, BorderStyle, BottomBorder, CharacterProperty, Color, Fonts, Indent,
    InsideHorizonBorder, InsideVerticalBorder, Italics, ItalicsComplex, Justification,
    JustificationVal, LeftBorder, ParagraphProperty, ParagraphStyleId, RightBorder, Shading,
    ShadingStyle, Size, SizeComplex, Spacing, TableBorders, TableCellProperty, TableCellWidth,
    TableHeader, TableJustification, TableJustificationVal, TableProperty, TableRowProperty,
    TableWidth, TableWidthUnit, TopBorder,
};
use std::io::Cursor;

/// A4 page width less the left and right margins, in twips.
pub const CONTENT_WIDTH_TWIPS: u32 = package::PAGE_WIDTH - 2 * package::MARGIN_SIDE;

const DRAWING_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PICTURE_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Writes [`Document`]s as `.docx` packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxRenderer;

impl Renderer for DocxRenderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let mut body = BodyBuilder::default();
        let mut docx = package::new_package(document.title.as_deref());
        for node in &document.nodes {
            match node {
                DocNode::Paragraph(p) => {
                    docx.document.push(body.paragraph(p));
                }
                DocNode::Table(t) => {
                    docx.document.push(body.table(t)?);
                }
            }
        }
        docx.document.push(package::section_property());

        let BodyBuilder { media, splices } = body;
        package::register_media(&mut docx, &media);
        log::debug!(
            "Serializing {} body nodes with {} media parts",
            document.nodes.len(),
            media.len()
        );

        let bytes = docx
            .write(Cursor::new(Vec::new()))
            .map_err(|e| Error::DocxWrite(format!("{:?}", e)))?
            .into_inner();
        if splices.is_empty() {
            return Ok(bytes);
        }
        splice::rewrite_part(bytes, DOCUMENT_PART, |xml| splices.apply(&xml))
    }
}

/// Accumulates what the body references outside `document.xml`.
#[derive(Default)]
struct BodyBuilder<'d> {
    media: Vec<MediaPart<'d>>,
    splices: Splices,
}

impl<'d> BodyBuilder<'d> {
    fn paragraph(&mut self, paragraph: &'d model::Paragraph) -> Paragraph<'static> {
        let mut out = Paragraph::default();
        if let Some(property) = paragraph_property(paragraph) {
            out = out.property(property);
        }
        for child in &paragraph.children {
            let run = match child {
                ParagraphChild::Run(run) => text_run(run),
                ParagraphChild::Math(latex) => Run::default().push_text(self.splices.math(latex)),
                ParagraphChild::Image(image) => self.image(image),
            };
            out = out.push(run);
        }
        out
    }

    fn image(&mut self, image: &'d ImageRun) -> Run<'static> {
        let index = self.media.len() + 1;
        let rel_id = format!("rIdImage{index}");
        let cx = pixels_to_emu(image.width);
        let cy = pixels_to_emu(image.height);

        let picture = Picture {
            a: PICTURE_NAMESPACE.into(),
            nv_pic_pr: NvPicPr {
                c_nv_pr: Some(CNvPr {
                    id: Some(index as isize),
                    name: Some(format!("image{index}.{}", image.extension).into()),
                    descr: None,
                }),
                c_nv_pic_pr: Some(CNvPicPr::default()),
            },
            fill: BlipFill {
                blip: Blip {
                    embed: rel_id.clone().into(),
                    cstate: None,
                },
                stretch: Some(Stretch {
                    fill_rect: Some(FillRect::default()),
                }),
            },
            sp_pr: SpPr {
                xfrm: Some(Xfrm {
                    offset: Some(Offset {
                        x: Some(0),
                        y: Some(0),
                    }),
                    ext: Some(Ext {
                        cx: Some(cx as isize),
                        cy: Some(cy as isize),
                    }),
                }),
                prst_geom: Some(PrstGeom {
                    prst: Some("rect".into()),
                    av_lst: Some(AvList::default()),
                }),
            },
        };
        let drawing = Drawing {
            anchor: None,
            inline: Some(Inline {
                dist_t: Some(0),
                dist_b: Some(0),
                dist_l: Some(0),
                dist_r: Some(0),
                extent: Some(Extent { cx, cy }),
                doc_property: DocPr {
                    id: Some(index as isize),
                    name: Some(format!("Picture {index}").into()),
                    descr: Some(strip_forbidden(&image.description).into_owned().into()),
                },
                graphic: Some(Graphic {
                    a: DRAWING_NAMESPACE.into(),
                    data: GraphicData {
                        uri: PICTURE_NAMESPACE.into(),
                        children: vec![picture],
                    },
                }),
                ..Default::default()
            }),
        };

        self.media.push(MediaPart {
            rel_id,
            target: format!("media/image{index}.{}", image.extension),
            extension: image.extension.clone(),
            data: &image.data,
        });
        Run::default().push(RunContent::Drawing(drawing))
    }

    fn table(&mut self, table: &'d model::Table) -> Result<Table<'static>> {
        let columns = table.column_count.max(1);
        let column_width = (CONTENT_WIDTH_TWIPS / columns as u32) as isize;

        let property = TableProperty {
            width: Some(TableWidth::from((5000, TableWidthUnit::Pct))),
            justification: table.alignment.map(table_justification),
            borders: Some(TableBorders {
                top: Some(TopBorder::default()),
                left: Some(LeftBorder::default()),
                bottom: Some(BottomBorder::default()),
                right: Some(RightBorder::default()),
                inside_horizon: Some(InsideHorizonBorder::default()),
                inside_vertical: Some(InsideVerticalBorder::default()),
            }),
            ..Default::default()
        };
        let mut out = Table {
            property,
            grids: TableGrid::from(vec![column_width; columns]),
            rows: Vec::new(),
        };

        if table.rows.is_empty() {
            // A table element must hold at least one row and cell.
            self.splices.cell(String::new());
            let cell = TableCell {
                property: cell_property(column_width),
                content: vec![TableCellContent::Paragraph(Paragraph::default())],
            };
            out = out.push_row(TableRow::default().push_cell(cell));
        }
        for row in &table.rows {
            let mut out_row = TableRow::default();
            if row.is_header {
                out_row.property = TableRowProperty::default().table_header(TableHeader::default());
            }
            for cell in &row.cells {
                out_row = out_row.push_cell(self.cell(cell, column_width)?);
            }
            out = out.push_row(out_row);
        }
        Ok(out)
    }

    fn cell(&mut self, cell: &'d model::TableCell, width: isize) -> Result<TableCell<'static>> {
        self.splices.cell(cell_extras(cell)?);
        let mut content: Vec<TableCellContent<'static>> = cell
            .paragraphs
            .iter()
            .map(|p| TableCellContent::Paragraph(self.paragraph(p)))
            .collect();
        if content.is_empty() {
            content.push(TableCellContent::Paragraph(Paragraph::default()));
        }
        Ok(TableCell {
            property: cell_property(width),
            content,
        })
    }
}

fn paragraph_property(paragraph: &model::Paragraph) -> Option<ParagraphProperty<'static>> {
    if paragraph.heading_level.is_none()
        && paragraph.shading.is_none()
        && paragraph.spacing.is_none()
        && paragraph.indent.is_none()
        && paragraph.alignment.is_none()
    {
        return None;
    }
    Some(ParagraphProperty {
        style_id: paragraph
            .heading_level
            .map(|level| ParagraphStyleId::from(format!("Heading{level}"))),
        shading: paragraph.shading.as_deref().map(shading),
        spacing: paragraph.spacing.map(|s| Spacing {
            before: Some(s.before as isize),
            after: Some(s.after as isize),
            line: s.line.map(|line| line as isize),
            ..Default::default()
        }),
        indent: paragraph.indent.map(|i| Indent {
            left: Some(i.left as isize),
            first_line: Some(i.first_line as isize),
            ..Default::default()
        }),
        justification: paragraph
            .alignment
            .map(|a| Justification::from(justification(a))),
        ..Default::default()
    })
}

fn text_run(run: &TextRun) -> Run<'static> {
    let font = strip_forbidden(&run.font).into_owned();
    let half_points = points_to_half_points(run.size) as isize;
    let property = CharacterProperty {
        fonts: Some(
            Fonts::default()
                .ascii(font.clone())
                .h_ansi(font.clone())
                .east_asia(font.clone())
                .custom(font),
        ),
        bold: run.bold.then(Bold::default),
        bold_complex: run.bold.then(BoldComplex::default),
        italics: run.italic.then(Italics::default),
        italics_complex: run.italic.then(ItalicsComplex::default),
        color: Some(Color::from(run.color.clone())),
        size: Some(Size::from(half_points)),
        size_complex: Some(SizeComplex {
            value: Some(half_points),
        }),
        shading: run.shading.as_deref().map(shading),
        ..Default::default()
    };
    push_text(Run::default().property(property), &run.text)
}

/// Tabs and line breaks become their own run content elements.
fn push_text(mut run: Run<'static>, text: &str) -> Run<'static> {
    let text = strip_forbidden(text);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.push(RunContent::Break(Break::default()));
        }
        for (j, segment) in line.split('\t').enumerate() {
            if j > 0 {
                run = run.push(RunContent::Tab(Tab));
            }
            if !segment.is_empty() {
                run = run.push_text((segment.to_string(), TextSpace::Preserve));
            }
        }
    }
    run
}

fn cell_property(width: isize) -> TableCellProperty {
    TableCellProperty {
        wide: Some(TableCellWidth {
            value: Some(width),
            unit: Some(TableWidthUnit::Dxa),
        }),
        ..Default::default()
    }
}

macro_rules! border {
    ($side:ident, $border:expr) => {
        match $border {
            Border::None => $side {
                style: BorderStyle::None,
                ..Default::default()
            },
            Border::Single { size, color } => $side {
                style: BorderStyle::Single,
                color: Some(color.hex().into()),
                size: Some(size as isize),
                space: Some(0),
                ..Default::default()
            },
        }
    };
}

/// `w:tcBorders` and `w:shd` for one cell, serialized for splicing.
fn cell_extras(cell: &model::TableCell) -> Result<String> {
    let borders = &cell.borders;
    let mut extra = String::from("<w:tcBorders>");
    extra.push_str(&element_xml(&border!(TopBorder, borders.top))?);
    extra.push_str(&element_xml(&border!(LeftBorder, borders.left))?);
    extra.push_str(&element_xml(&border!(BottomBorder, borders.bottom))?);
    extra.push_str(&element_xml(&border!(RightBorder, borders.right))?);
    extra.push_str("</w:tcBorders>");
    if let Some(fill) = &cell.shading {
        extra.push_str(&element_xml(&shading(fill))?);
    }
    Ok(extra)
}

fn justification(alignment: Alignment) -> JustificationVal {
    match alignment {
        Alignment::Left => JustificationVal::Left,
        Alignment::Center => JustificationVal::Center,
        Alignment::Right => JustificationVal::Right,
        Alignment::Justify => JustificationVal::Both,
    }
}

/// Tables have no justified alignment; it falls back to the leading edge.
fn table_justification(alignment: Alignment) -> TableJustification {
    TableJustification::from(match alignment {
        Alignment::Left | Alignment::Justify => TableJustificationVal::Left,
        Alignment::Center => TableJustificationVal::Center,
        Alignment::Right => TableJustificationVal::Right,
    })
}

fn shading(fill: &str) -> Shading<'static> {
    Shading {
        style: Some(ShadingStyle::Clear),
        color: Some("auto".into()),
        fill: Some(fill.to_string().into()),
        ..Default::default()
    }
}
