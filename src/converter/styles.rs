//! Style resolver - picks the effective document style for a run.

use crate::core::style::{DocumentStyle, StyleTemplate};
use log::debug;

/// Resolver for template presets and custom overrides.
pub struct StyleResolver;

impl StyleResolver {
    /// Resolves the effective style.
    ///
    /// A custom override is used verbatim (no merging with a preset) when the
    /// template is [`StyleTemplate::Custom`]. `Custom` without an override
    /// falls back to the standard preset.
    pub fn resolve(template: StyleTemplate, custom: Option<&DocumentStyle>) -> DocumentStyle {
        match (template, custom) {
            (StyleTemplate::Custom, Some(style)) => style.clone(),
            (StyleTemplate::Custom, None) => {
                debug!("custom template selected without a style; using standard preset");
                DocumentStyle::standard()
            }
            (StyleTemplate::Academic, _) => DocumentStyle::academic(),
            (StyleTemplate::Note, _) => DocumentStyle::note(),
            (StyleTemplate::Standard, _) => DocumentStyle::standard(),
        }
    }
}
