//! Post-serialization patches for markup `docx_rust` has no types for.
//!
//! Office Math runs and the `w:tcBorders`/`w:shd` children of `w:tcPr` are
//! spliced into `word/document.xml` after the package is written. Everything
//! else in the body comes from the crate's node model.

use super::escape::escape_xml;
use crate::{Error, Result};
use hard_xml::XmlWrite;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

const MATH_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// `w:vAlign` is the last child `docx_rust` writes in every `w:tcPr`, and
/// the schema orders `w:tcBorders` and `w:shd` before it.
const CELL_PROPERTY_OPEN: &str = "<w:tcPr>";
const CELL_PROPERTY_ANCHOR: &str = "<w:vAlign";

/// Pending patches, recorded in document order while the body is built.
#[derive(Debug, Default)]
pub(crate) struct Splices {
    math: Vec<String>,
    cells: Vec<String>,
}

impl Splices {
    /// Records a formula and returns the placeholder text to put in its run.
    pub(crate) fn math(&mut self, latex: &str) -> String {
        let placeholder = placeholder(self.math.len());
        self.math.push(latex.to_string());
        placeholder
    }

    /// Records the extra `w:tcPr` children of the next cell, possibly none.
    pub(crate) fn cell(&mut self, extra: String) {
        self.cells.push(extra);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.math.is_empty() && self.cells.iter().all(String::is_empty)
    }

    pub(crate) fn apply(&self, xml: &str) -> Result<String> {
        let mut xml = xml.to_string();
        for (index, latex) in self.math.iter().enumerate() {
            let run = format!("<w:r><w:t>{}</w:t></w:r>", placeholder(index));
            if !xml.contains(&run) {
                return Err(Error::DocxWrite(format!("math placeholder {index} not found")));
            }
            xml = xml.replacen(&run, &omml(latex), 1);
        }
        if self.cells.iter().all(String::is_empty) {
            return Ok(xml);
        }
        splice_cells(&xml, &self.cells)
    }
}

fn placeholder(index: usize) -> String {
    format!("\u{E000}math{index}\u{E000}")
}

fn omml(latex: &str) -> String {
    format!(
        r#"<m:oMath xmlns:m="{MATH_NAMESPACE}"><m:r><m:t xml:space="preserve">{}</m:t></m:r></m:oMath>"#,
        escape_xml(latex)
    )
}

fn splice_cells(xml: &str, cells: &[String]) -> Result<String> {
    let extra_len: usize = cells.iter().map(String::len).sum();
    let mut out = String::with_capacity(xml.len() + extra_len);
    let mut rest = xml;
    for (index, extra) in cells.iter().enumerate() {
        let anchor = rest
            .find(CELL_PROPERTY_OPEN)
            .and_then(|start| {
                rest[start..]
                    .find(CELL_PROPERTY_ANCHOR)
                    .map(|offset| start + offset)
            })
            .ok_or_else(|| Error::DocxWrite(format!("cell {index} has no properties")))?;
        out.push_str(&rest[..anchor]);
        out.push_str(extra);
        rest = &rest[anchor..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Serializes one `docx_rust` element for splicing.
pub(crate) fn element_xml<T: XmlWrite>(element: &T) -> Result<String> {
    element
        .to_string()
        .map_err(|e| Error::DocxWrite(format!("{:?}", e)))
}

/// Copies `package`, replacing the named part with `patch` applied to its text.
pub(crate) fn rewrite_part(
    package: Vec<u8>,
    name: &str,
    patch: impl FnOnce(String) -> Result<String>,
) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut original = String::new();
    archive.by_name(name)?.read_to_string(&mut original)?;
    let patched = patch(original)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.name() == name {
            drop(entry);
            zip.start_file(name, options)?;
            zip.write_all(patched.as_bytes())?;
        } else {
            zip.raw_copy_file(entry)?;
        }
    }
    Ok(zip.finish()?.into_inner())
}
