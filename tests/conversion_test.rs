use md2docx::core::ast::TextRun;
use md2docx::core::document::{Border, DocNode, Document, Paragraph, ParagraphChild, RgbColor};
use md2docx::{
    Alignment, ConvertOptions, Error, ImageFetcher, Language, MarkdownToDocx, Result,
    StyleTemplate,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

#[derive(Default)]
struct MemoryFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl ImageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.images.get(url).cloned().ok_or_else(|| Error::ImageFetch {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

fn converter(options: ConvertOptions, fetcher: MemoryFetcher) -> MarkdownToDocx<MemoryFetcher> {
    MarkdownToDocx::with_fetcher(options, fetcher)
}

fn options(template: StyleTemplate, language: Language) -> ConvertOptions {
    ConvertOptions {
        template,
        language,
        ..Default::default()
    }
}

fn paragraph(node: &DocNode) -> &Paragraph {
    node.as_paragraph().expect("expected a paragraph node")
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut content = String::new();
    archive
        .by_name(name)
        .expect("part present")
        .read_to_string(&mut content)
        .expect("utf-8 part");
    content
}

#[derive(Debug, PartialEq)]
enum Inline {
    Text(String, bool),
    Math(String),
}

fn inline_sequence(para: &Paragraph) -> Vec<Inline> {
    para.children
        .iter()
        .map(|child| match child {
            ParagraphChild::Run(TextRun { text, bold, .. }) => Inline::Text(text.clone(), *bold),
            ParagraphChild::Math(latex) => Inline::Math(latex.clone()),
            ParagraphChild::Image(_) => panic!("unexpected image"),
        })
        .collect()
}

#[tokio::test]
async fn scenario_heading_alignment_override_and_inline_runs() {
    let md = "# Title {:align=left}\n\nHello **world** and $x^2$.";
    let document = converter(ConvertOptions::default(), MemoryFetcher::default())
        .build_document(md)
        .await;

    assert_eq!(document.nodes.len(), 2);

    let heading = paragraph(&document.nodes[0]);
    assert_eq!(heading.heading_level, Some(1));
    assert_eq!(heading.alignment, Some(Alignment::Left));
    assert_eq!(heading.plain_text(), "Title");

    let body = paragraph(&document.nodes[1]);
    assert_eq!(
        inline_sequence(body),
        vec![
            Inline::Text("Hello ".into(), false),
            Inline::Text("world".into(), true),
            Inline::Text(" and ".into(), false),
            Inline::Math("x^2".into()),
            Inline::Text(".".into(), false),
        ]
    );
}

#[tokio::test]
async fn scenario_three_line_table_with_caption() {
    let md = "| Name | Score |\n|------|-------|\n| A | 1 |\n| B | 2 |";
    let document = converter(
        options(StyleTemplate::Academic, Language::Chinese),
        MemoryFetcher::default(),
    )
    .build_document(md)
    .await;

    assert_eq!(document.nodes.len(), 2);
    assert_eq!(paragraph(&document.nodes[0]).plain_text(), "表 1");

    let table = document.nodes[1].as_table().expect("table");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.column_count, 2);

    let thick = Border::single(12, RgbColor::BLACK);
    let thin = Border::single(4, RgbColor::BLACK);
    for (r, row) in table.rows.iter().enumerate() {
        for cell in &row.cells {
            let b = cell.borders;
            assert_eq!(b.left, Border::None);
            assert_eq!(b.right, Border::None);
            match r {
                0 => {
                    assert_eq!(b.top, thick);
                    assert_eq!(b.bottom, thin);
                }
                1 => {
                    assert_eq!(b.top, Border::None);
                    assert_eq!(b.bottom, Border::None);
                }
                _ => {
                    assert_eq!(b.top, Border::None);
                    assert_eq!(b.bottom, thick);
                }
            }
        }
    }
}

#[tokio::test]
async fn scenario_unterminated_code_fence() {
    let md = "Intro\n\n```python\nprint(1)\n\nprint(2)";
    let document = converter(ConvertOptions::default(), MemoryFetcher::default())
        .build_document(md)
        .await;

    assert_eq!(document.nodes.len(), 2);
    let code = document.nodes[1].as_table().expect("code block table");
    assert_eq!(code.rows.len(), 1);
    assert_eq!(code.rows[0].cells[0].paragraphs.len(), 3);
    assert_eq!(document.nodes[1].plain_text(), "print(1)\n\nprint(2)");
}

#[tokio::test]
async fn scenario_failed_image_becomes_placeholder() {
    let md = "Before\n\n![Sales chart](https://example.invalid/chart.png)\n\nAfter";
    let converter = converter(ConvertOptions::default(), MemoryFetcher::default());

    let document = converter.build_document(md).await;
    assert_eq!(document.nodes.len(), 3);
    let placeholder = paragraph(&document.nodes[1]);
    assert_eq!(placeholder.alignment, Some(Alignment::Center));
    assert!(placeholder.plain_text().contains("Sales chart"));
    assert!(placeholder.text_runs().all(|r| r.color == "FF0000"));

    let bytes = converter.convert(md).await.expect("conversion succeeds");
    let xml = read_part(&bytes, "word/document.xml");
    assert!(xml.contains("Sales chart"));
    assert!(!xml.contains("<w:drawing>"));
}

#[tokio::test]
async fn oversized_image_is_scaled_and_embedded() {
    let mut fetcher = MemoryFetcher::default();
    fetcher.images.insert("wide.png".into(), png(1000, 333));
    fetcher.images.insert("small.png".into(), png(120, 80));
    let converter = converter(ConvertOptions::default(), fetcher);

    let md = "![Wide](wide.png)\n\n![](small.png)";
    let document = converter.build_document(md).await;
    let sizes: Vec<(u32, u32)> = document
        .nodes
        .iter()
        .filter_map(|n| n.as_paragraph())
        .flat_map(|p| p.children.iter())
        .filter_map(|c| match c {
            ParagraphChild::Image(img) => Some((img.width, img.height)),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![(550, 183), (120, 80)]);

    // The wide image gets an alt caption, the unnamed one does not.
    assert_eq!(document.nodes.len(), 3);
    assert_eq!(paragraph(&document.nodes[1]).plain_text(), "Wide");

    let bytes = converter.convert(md).await.expect("conversion succeeds");
    let rels = read_part(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains("media/image1.png"));
    assert!(rels.contains("media/image2.png"));
    let types = read_part(&bytes, "[Content_Types].xml");
    assert!(types.contains(r#"Extension="png""#));
}

#[tokio::test]
async fn conversion_is_idempotent_and_captions_restart() {
    let md = "# Report\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nText\n\n| c |\n|---|\n| 3 |";
    let converter = converter(ConvertOptions::default(), MemoryFetcher::default());

    let first = converter.build_document(md).await;
    let second = converter.build_document(md).await;
    assert_eq!(first, second);

    let captions: Vec<String> = first
        .nodes
        .iter()
        .map(DocNode::plain_text)
        .filter(|t| t.starts_with("Table "))
        .collect();
    assert_eq!(captions, vec!["Table 1", "Table 2"]);

    let bytes_a = converter.convert(md).await.expect("first");
    let bytes_b = converter.convert(md).await.expect("second");
    assert_eq!(
        read_part(&bytes_a, "word/document.xml"),
        read_part(&bytes_b, "word/document.xml")
    );
}

#[tokio::test]
async fn deep_headings_use_third_heading_style() {
    let document = converter(ConvertOptions::default(), MemoryFetcher::default())
        .build_document("### Three\n\n###### Six")
        .await;

    let three = paragraph(&document.nodes[0]);
    let six = paragraph(&document.nodes[1]);
    assert_eq!(three.heading_level, Some(3));
    assert_eq!(six.heading_level, Some(3));
    assert_eq!(three.spacing, six.spacing);
    assert_eq!(three.alignment, six.alignment);
    let run_three = three.text_runs().next().expect("run");
    let run_six = six.text_runs().next().expect("run");
    assert_eq!(
        (&run_three.font, run_three.size, &run_three.color),
        (&run_six.font, run_six.size, &run_six.color)
    );
}

#[tokio::test]
async fn centered_paragraph_drops_first_line_indent() {
    let document = converter(ConvertOptions::default(), MemoryFetcher::default())
        .build_document("Justified body\n\nCentered {:align=center}\n\nRight {:align=right}")
        .await;

    let indents: Vec<u32> = document
        .nodes
        .iter()
        .map(|n| paragraph(n).first_line_indent())
        .collect();
    assert_eq!(indents, vec![360, 0, 0]);
}

#[tokio::test]
async fn package_contains_styled_document() {
    let md = "# 标题\n\n正文 **加粗** 与 `code`";
    let bytes = converter(ConvertOptions::default(), MemoryFetcher::default())
        .convert(md)
        .await
        .expect("conversion succeeds");

    let xml = read_part(&bytes, "word/document.xml");
    assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert!(xml.contains(r#"w:eastAsia="宋体""#));
    assert!(xml.contains(r#"w:ascii="Consolas""#));
    assert!(xml.contains(r#"<w:shd w:val="clear" w:color="auto" w:fill="F3F4F4"/>"#));
    assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));

    let core = read_part(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>标题</dc:title>"));
}

#[tokio::test]
async fn three_line_borders_reach_document_xml() {
    let md = "| a | b |\n|---|---|\n| 1 | 2 |";
    let bytes = converter(
        options(StyleTemplate::Academic, Language::English),
        MemoryFetcher::default(),
    )
    .convert(md)
    .await
    .expect("conversion succeeds");

    let xml = read_part(&bytes, "word/document.xml");
    assert!(xml.contains(r#"<w:top w:val="single" w:color="000000" w:sz="12" w:space="0"/>"#));
    assert!(xml.contains(r#"<w:bottom w:val="single" w:color="000000" w:sz="4" w:space="0"/>"#));
    assert!(xml.contains(r#"<w:bottom w:val="single" w:color="000000" w:sz="12" w:space="0"/>"#));
    assert!(!xml.contains(r#"<w:left w:val="single""#));
}

#[tokio::test]
async fn convert_file_writes_nothing_when_input_is_missing() {
    let dir = std::env::temp_dir().join(format!("md2docx_missing_{}", std::process::id()));
    let output = dir.join("out.docx");
    let converter = converter(ConvertOptions::default(), MemoryFetcher::default());

    let result = converter
        .convert_file(dir.join("does-not-exist.md"), &output)
        .await;
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!output.exists());
}

#[test]
fn empty_document_renders() {
    use md2docx::{DocxRenderer, Renderer};

    let bytes = DocxRenderer
        .render(&Document::default())
        .expect("empty document renders");
    let xml = read_part(&bytes, "word/document.xml");
    assert!(xml.contains("<w:body><w:sectPr>"));
}
