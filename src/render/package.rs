//! Package-level parts around the body: styles, page setup, core
//! properties and media registration.

use docx_rust::content_type::DefaultContentType;
use docx_rust::core::{Core, CoreNamespace};
use docx_rust::formatting::{
    CharacterProperty, KeepNext, Lang, OutlineLvl, PageMargin, PageSize, ParagraphProperty,
    SectionProperty,
};
use docx_rust::media::MediaType;
use docx_rust::rels::{Relationship, Relationships};
use docx_rust::styles::{BasedOn, DefaultStyle, Next, QFormat, Style, StyleType, Styles};
use docx_rust::Docx;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// A4 portrait, in twips.
pub(crate) const PAGE_WIDTH: u32 = 11906;
pub(crate) const PAGE_HEIGHT: u32 = 16838;
pub(crate) const MARGIN_VERTICAL: u32 = 1440;
pub(crate) const MARGIN_SIDE: u32 = 1800;

const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// An embedded picture referenced from the body as `rel_id`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MediaPart<'d> {
    pub rel_id: String,
    /// Path under `word/`, e.g. `media/image1.png`.
    pub target: String,
    pub extension: String,
    pub data: &'d Vec<u8>,
}

/// An empty package with the styles and core properties every output shares.
pub(crate) fn new_package<'d>(title: Option<&str>) -> Docx<'d> {
    let mut docx = Docx::default();
    // Only the parts written below are declared.
    docx.content_types
        .overrides
        .retain(|o| o.part != "/docProps/app.xml");
    docx.styles = styles();
    docx.core = Some(Core::CoreNamespace(CoreNamespace {
        title: title.map(|t| Cow::Owned(t.to_string())),
        creator: Some("md2docx".into()),
        ..Default::default()
    }));
    docx
}

/// Registers media with fixed relationship ids so `r:embed` values in the
/// body stay stable across runs.
pub(crate) fn register_media<'d>(docx: &mut Docx<'d>, media: &[MediaPart<'d>]) {
    if media.is_empty() {
        return;
    }
    let rels = docx.document_rels.get_or_insert_with(Relationships::default);
    for part in media {
        rels.relationships.push(Relationship {
            id: part.rel_id.clone().into(),
            target: part.target.clone().into(),
            ty: IMAGE_RELATIONSHIP.into(),
            target_mode: None,
        });
        docx.media
            .insert(part.target.clone(), (MediaType::Image, part.data));
    }

    let extensions: BTreeSet<&str> = media.iter().map(|m| m.extension.as_str()).collect();
    for extension in extensions {
        docx.content_types.defaults.push(DefaultContentType {
            ext: extension.to_string().into(),
            ty: image_content_type(extension).into(),
        });
    }
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/png",
    }
}

pub(crate) fn section_property() -> SectionProperty<'static> {
    SectionProperty {
        page_size: Some(PageSize {
            weight: PAGE_WIDTH as isize,
            height: PAGE_HEIGHT as isize,
        }),
        page_margin: Some(PageMargin {
            top: Some(MARGIN_VERTICAL as isize),
            right: Some(MARGIN_SIDE as isize),
            bottom: Some(MARGIN_VERTICAL as isize),
            left: Some(MARGIN_SIDE as isize),
            header: Some(851),
            footer: Some(992),
            gutter: Some(0),
        }),
        ..Default::default()
    }
}

/// `Normal` plus `Heading1`..`Heading3`, which carry the outline levels
/// Word's navigation pane reads.
fn styles() -> Styles<'static> {
    let mut styles = Styles::new();
    styles.default(DefaultStyle::default().character(CharacterProperty {
        lang: Some(Lang {
            val: Some("en-US".into()),
            east_asia: Some("zh-CN".into()),
            bidi: None,
        }),
        ..Default::default()
    }));

    let mut normal = Style::new(StyleType::Paragraph, "Normal").name("Normal");
    normal.default = Some(true);
    normal.q_format = Some(QFormat { value: None });
    styles.push(normal);

    for level in 1..=3 {
        let mut heading = Style::new(StyleType::Paragraph, format!("Heading{level}"))
            .name(format!("heading {level}"))
            .paragraph(ParagraphProperty {
                keep_next: Some(KeepNext::default()),
                outline_lvl: Some(OutlineLvl {
                    value: level as isize - 1,
                }),
                ..Default::default()
            });
        heading.base = Some(BasedOn {
            value: "Normal".into(),
        });
        heading.next = Some(Next {
            value: "Normal".into(),
        });
        heading.q_format = Some(QFormat { value: None });
        styles.push(heading);
    }

    let mut table = Style::new(StyleType::Table, "TableNormal").name("Normal Table");
    table.default = Some(true);
    styles.push(table);
    styles
}
