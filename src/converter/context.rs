use crate::core::style::DocumentStyle;
use crate::localization::LocalizationStrategy;

/// Counters reported at the end of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub blocks: usize,
    pub tables: usize,
    pub images: usize,
    pub failed_images: usize,
}

/// Per-run state shared by the block emitters.
///
/// The style is borrowed immutably for the whole run; only the counters change.
pub struct ConversionContext<'a> {
    style: &'a DocumentStyle,
    localization: &'a dyn LocalizationStrategy,
    stats: ConversionStats,
}

impl<'a> ConversionContext<'a> {
    pub fn new(style: &'a DocumentStyle, localization: &'a dyn LocalizationStrategy) -> Self {
        Self {
            style,
            localization,
            stats: ConversionStats::default(),
        }
    }

    pub fn style(&self) -> &'a DocumentStyle {
        self.style
    }

    pub fn localization(&self) -> &'a dyn LocalizationStrategy {
        self.localization
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    pub(crate) fn record_block(&mut self) {
        self.stats.blocks += 1;
    }

    pub(crate) fn record_table(&mut self) {
        self.stats.tables += 1;
    }

    pub(crate) fn record_image(&mut self, loaded: bool) {
        if loaded {
            self.stats.images += 1;
        } else {
            self.stats.failed_images += 1;
        }
    }
}
