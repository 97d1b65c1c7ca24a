//! # md2docx
//!
//! Markdown to DOCX converter with Chinese-typesetting style presets.
//!
//! ## Example
//!
//! ```no_run
//! use md2docx::{ConvertOptions, MarkdownToDocx, StyleTemplate};
//!
//! # async fn run() -> md2docx::Result<()> {
//! let options = ConvertOptions {
//!     template: StyleTemplate::Academic,
//!     ..Default::default()
//! };
//!
//! let converter = MarkdownToDocx::new(options)?;
//! let bytes = converter.convert("# Title\n\nBody text").await?;
//! std::fs::write("document.docx", bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod converter;
pub mod core;
pub mod error;
pub mod localization;
pub mod render;

pub use converter::{DefaultImageFetcher, ImageFetcher, MarkdownToDocx};
pub use crate::core::ast::{Alignment, Block};
pub use crate::core::document::Document;
pub use crate::core::style::{DocumentStyle, StyleTemplate};
pub use error::{Error, Result};
pub use localization::{ChineseLocalization, DefaultLocalization, LocalizationStrategy};
pub use render::{DocxRenderer, Renderer};

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Images wider than this many pixels are scaled down (A4 content width at 96 DPI).
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 550;

/// Options for Markdown to DOCX conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Named style preset.
    pub template: StyleTemplate,
    /// Style used when `template` is [`StyleTemplate::Custom`].
    pub custom_style: Option<DocumentStyle>,
    /// Wording of generated captions and placeholders.
    pub language: Language,
    pub max_image_width: u32,
    /// Directory that relative image paths are resolved against.
    pub base_dir: Option<PathBuf>,
    /// Per-request timeout for remote images. `None` waits indefinitely.
    pub image_timeout: Option<Duration>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            template: StyleTemplate::Standard,
            custom_style: None,
            language: Language::English,
            max_image_width: DEFAULT_MAX_IMAGE_WIDTH,
            base_dir: None,
            image_timeout: None,
        }
    }
}

/// Language of the text the converter generates itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl Language {
    pub fn localization(&self) -> &'static dyn LocalizationStrategy {
        match self {
            Language::English => &DefaultLocalization,
            Language::Chinese => &ChineseLocalization,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "cn" | "chinese" => Ok(Language::Chinese),
            other => Err(Error::Conversion(format!("unsupported language '{}'", other))),
        }
    }
}

// Python bindings (only when 'python' feature is enabled)
#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    /// Converts Markdown text to the bytes of a DOCX file.
    #[pyfunction]
    #[pyo3(signature = (markdown, template = "standard"))]
    fn convert_markdown<'py>(
        py: Python<'py>,
        markdown: &str,
        template: &str,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let to_py_err = |e: Error| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string());

        let options = ConvertOptions {
            template: template.parse().unwrap_or_default(),
            ..Default::default()
        };
        let converter = MarkdownToDocx::new(options).map_err(to_py_err)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| to_py_err(Error::Io(e)))?;
        let bytes = py
            .allow_threads(|| runtime.block_on(converter.convert(markdown)))
            .map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// A Python module implemented in Rust.
    #[pymodule]
    pub fn md2docx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convert_markdown, m)?)?;
        Ok(())
    }
}
