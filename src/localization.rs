//! Localization strategy for language-specific document wording.

/// Strategy for the fixed strings the converter writes into documents.
pub trait LocalizationStrategy: Send + Sync {
    /// Caption placed above the `index`-th table (1-based).
    fn table_caption(&self, index: usize) -> String;

    /// Placeholder shown when an image cannot be loaded.
    fn image_unavailable(&self, alt: &str) -> String;
}

/// English wording.
pub struct DefaultLocalization;

impl LocalizationStrategy for DefaultLocalization {
    fn table_caption(&self, index: usize) -> String {
        format!("Table {}", index)
    }

    fn image_unavailable(&self, alt: &str) -> String {
        if alt.is_empty() {
            "[Image failed to load]".to_string()
        } else {
            format!("[Image failed to load: {}]", alt)
        }
    }
}

/// Chinese wording ("表 1").
pub struct ChineseLocalization;

impl LocalizationStrategy for ChineseLocalization {
    fn table_caption(&self, index: usize) -> String {
        format!("表 {}", index)
    }

    fn image_unavailable(&self, alt: &str) -> String {
        if alt.is_empty() {
            "[图片加载失败]".to_string()
        } else {
            format!("[图片加载失败: {}]", alt)
        }
    }
}
