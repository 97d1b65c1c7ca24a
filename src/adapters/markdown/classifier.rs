//! Line classifier: decides the block kind at a cursor position and how many
//! source lines the block consumes.

use crate::core::ast::{Alignment, Block, TableBlock};
use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\{:\s*align\s*=\s*(left|center|right|justify)\s*\}\s*$")
        .expect("valid trailing alignment regex")
});

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(#{1,6}\s*|>\s*|[-*+]\s+|\d+[.)]\s+)?\{:\s*align\s*=\s*(left|center|right|justify)\s*\}\s*",
    )
    .expect("valid leading alignment regex")
});

static IMAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]*)\)").expect("valid image regex"));

static SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|[:\s-]+\|").expect("valid separator regex"));

/// Result of classifying the line at a cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// `None` for blank lines.
    pub block: Option<Block>,
    /// Source lines consumed, at least 1.
    pub consumed: usize,
}

/// Removes a `{:align=...}` marker from the start or end of a line's content.
///
/// A leading marker may follow a heading, quote or list prefix; the prefix is kept.
pub fn strip_alignment_marker(line: &str) -> (String, Option<Alignment>) {
    if let Some(caps) = TRAILING_MARKER.captures(line) {
        let alignment = caps[1].parse().ok();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(line.len());
        return (line[..start].to_string(), alignment);
    }

    if let Some(caps) = LEADING_MARKER.captures(line) {
        let alignment = caps[2].parse().ok();
        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        return (format!("{}{}", prefix, &line[end..]), alignment);
    }

    (line.to_string(), None)
}

/// Classifies the block starting at `lines[index]`.
pub fn classify_at(lines: &[&str], index: usize) -> Classified {
    let Some(raw) = lines.get(index) else {
        return blank();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return blank();
    }

    let (content, alignment) = strip_alignment_marker(trimmed);
    let content = content.trim();
    if content.is_empty() {
        return blank();
    }

    if content.starts_with('#') {
        let level = content.chars().take_while(|c| *c == '#').count();
        return single(Block::Heading {
            level,
            content: content[level..].trim().to_string(),
            alignment,
        });
    }

    if let Some(caps) = IMAGE_LINE.captures(content) {
        let url = caps[2].split_whitespace().next().unwrap_or("").to_string();
        return single(Block::Image {
            alt: caps[1].trim().to_string(),
            url,
        });
    }

    if let Some(info) = content.strip_prefix("```") {
        return classify_code_fence(lines, index, info);
    }

    if content.starts_with('|') {
        return classify_table(lines, index);
    }

    if let Some(rest) = content.strip_prefix("$$") {
        return classify_math(lines, index, rest.trim(), content, alignment);
    }

    if let Some(quote) = content.strip_prefix('>') {
        return single(Block::Blockquote {
            content: quote.trim().to_string(),
            alignment,
        });
    }

    single(Block::Paragraph {
        content: content.to_string(),
        alignment,
    })
}

fn blank() -> Classified {
    Classified {
        block: None,
        consumed: 1,
    }
}

fn single(block: Block) -> Classified {
    Classified {
        block: Some(block),
        consumed: 1,
    }
}

fn classify_code_fence(lines: &[&str], index: usize, info: &str) -> Classified {
    let language = info.trim().trim_end_matches('`').trim();
    let language = (!language.is_empty()).then(|| language.to_string());

    let mut body = Vec::new();
    let mut cursor = index + 1;
    let mut closed = false;
    while cursor < lines.len() {
        let line = lines[cursor];
        cursor += 1;
        if line.trim_start().starts_with("```") {
            closed = true;
            break;
        }
        body.push(line.to_string());
    }
    if !closed {
        log::debug!("code fence opened at line {} runs to end of input", index + 1);
    }

    Classified {
        block: Some(Block::CodeFence {
            language,
            lines: body,
        }),
        consumed: cursor - index,
    }
}

fn classify_table(lines: &[&str], index: usize) -> Classified {
    let mut header = None;
    let mut rows = Vec::new();
    let mut cursor = index;

    while cursor < lines.len() {
        // Markers on table rows are dropped; tables carry their own alignment.
        let (row, _) = strip_alignment_marker(lines[cursor].trim());
        let row = row.trim();
        if !row.starts_with('|') {
            break;
        }
        cursor += 1;
        if SEPARATOR_ROW.is_match(row) {
            continue;
        }
        let cells = split_row(row);
        if header.is_none() {
            header = Some(cells);
        } else {
            rows.push(cells);
        }
    }

    Classified {
        block: Some(Block::Table(TableBlock {
            header,
            rows,
            caption_index: 0,
        })),
        consumed: (cursor - index).max(1),
    }
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Only a bare `$$` line opens a multi-line block. A `$$` line with text
/// that does not close on the same line is an ordinary paragraph.
fn classify_math(
    lines: &[&str],
    index: usize,
    rest: &str,
    content: &str,
    alignment: Option<Alignment>,
) -> Classified {
    if let Some(formula) = rest.strip_suffix("$$") {
        return single(Block::MathBlock {
            latex: formula.trim().to_string(),
        });
    }
    if !rest.is_empty() {
        return single(Block::Paragraph {
            content: content.to_string(),
            alignment,
        });
    }

    let mut body = Vec::new();
    let mut cursor = index + 1;
    while cursor < lines.len() {
        let line = lines[cursor];
        cursor += 1;
        if line.trim() == "$$" {
            break;
        }
        body.push(line.to_string());
    }

    Classified {
        block: Some(Block::MathBlock {
            latex: body.join("\n").trim().to_string(),
        }),
        consumed: cursor - index,
    }
}
