use md2docx::adapters::markdown::{BlockExtractor, MarkdownExtractor};
use md2docx::core::ast::{InlineRun, TableBlock};
use md2docx::converter::{RunConverter, RunStyle};
use md2docx::{Alignment, Block};
use pretty_assertions::assert_eq;

fn kinds(blocks: &[Block]) -> Vec<&'static str> {
    blocks.iter().map(Block::kind).collect()
}

#[test]
fn extracts_every_block_kind_in_order() {
    let md = "\
# Heading
Plain paragraph
> quoted {:align=right}
![Logo](logo.png)
```rust
let x = 1;
```
| a | b |
|---|---|
| 1 | 2 |
$$
E = mc^2
$$";

    let blocks = MarkdownExtractor.extract(md);
    assert_eq!(
        kinds(&blocks),
        vec!["heading", "paragraph", "blockquote", "image", "code", "table", "math"]
    );
    assert_eq!(
        blocks[2],
        Block::Blockquote {
            content: "quoted".into(),
            alignment: Some(Alignment::Right),
        }
    );
    assert_eq!(
        blocks[6],
        Block::MathBlock {
            latex: "E = mc^2".into()
        }
    );
}

#[test]
fn tables_are_numbered_in_document_order() {
    let md = "| a |\n|---|\n| 1 |\n\ntext\n\n| b |\n| 2 |";
    let indexes: Vec<usize> = MarkdownExtractor
        .extract(md)
        .into_iter()
        .filter_map(|block| match block {
            Block::Table(TableBlock { caption_index, .. }) => Some(caption_index),
            _ => None,
        })
        .collect();
    assert_eq!(indexes, vec![1, 2]);
}

#[test]
fn leading_alignment_marker_on_heading() {
    let blocks = MarkdownExtractor.extract("## {:align=center} Centered");
    assert_eq!(
        blocks,
        vec![Block::Heading {
            level: 2,
            content: "Centered".into(),
            alignment: Some(Alignment::Center),
        }]
    );
}

#[test]
fn unclosed_display_math_runs_to_end() {
    let blocks = MarkdownExtractor.extract("$$\na + b\nc");
    assert_eq!(
        blocks,
        vec![Block::MathBlock {
            latex: "a + b\nc".into()
        }]
    );
}

#[test]
fn inline_spans_keep_surrounding_text() {
    let style = RunStyle::new("Arial", 12.0, "000000");
    let runs = RunConverter::convert("a __b__ _c_ `d` $e$ f", &style);
    let texts: Vec<&str> = runs.iter().map(InlineRun::text).collect();
    assert_eq!(texts, vec!["a ", "b", " ", "c", " ", "d", " ", "e", " f"]);
    assert!(matches!(runs[7], InlineRun::Math(ref latex) if latex == "e"));
}

#[test]
fn unmatched_delimiters_are_literal() {
    let style = RunStyle::new("Arial", 12.0, "000000");
    let runs = RunConverter::convert("2 * 3 = 6 and $5", &style);
    let texts: Vec<&str> = runs.iter().map(InlineRun::text).collect();
    assert_eq!(texts.concat(), "2 * 3 = 6 and $5");
}

#[test]
fn display_math_line_with_trailing_text_is_a_paragraph() {
    let blocks = MarkdownExtractor.extract("$$x$$ where x is real\n\nNext paragraph\n\n# Heading");
    assert_eq!(kinds(&blocks), vec!["paragraph", "paragraph", "heading"]);
    assert_eq!(
        blocks[0],
        Block::Paragraph {
            content: "$$x$$ where x is real".into(),
            alignment: None,
        }
    );
}

#[test]
fn leading_marker_before_table_keeps_one_table() {
    let blocks = MarkdownExtractor.extract("{:align=center} | a | b |\n| 1 | 2 |");
    assert_eq!(
        blocks,
        vec![Block::Table(TableBlock {
            header: Some(vec!["a".into(), "b".into()]),
            rows: vec![vec!["1".into(), "2".into()]],
            caption_index: 1,
        })]
    );
}

#[test]
fn trailing_marker_on_table_header_is_not_a_cell() {
    let blocks = MarkdownExtractor.extract("| a | b | {:align=center}\n|---|---|\n| 1 | 2 |");
    assert_eq!(
        blocks,
        vec![Block::Table(TableBlock {
            header: Some(vec!["a".into(), "b".into()]),
            rows: vec![vec!["1".into(), "2".into()]],
            caption_index: 1,
        })]
    );
}

#[test]
fn leading_marker_before_code_fence() {
    let blocks = MarkdownExtractor.extract("{:align=right} ```sh\necho hi\n```\nafter");
    assert_eq!(kinds(&blocks), vec!["code", "paragraph"]);
    assert_eq!(
        blocks[0],
        Block::CodeFence {
            language: Some("sh".into()),
            lines: vec!["echo hi".into()],
        }
    );
}
