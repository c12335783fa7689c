//! Run configuration for the two pipeline stages.

/// Base URL that rewritten manual links point at.
pub const DEFAULT_SITE_URL: &str = "https://php.net/manual/zh/";

/// Extension of stub source files (also the extension rewritten links get).
pub const DEFAULT_SOURCE_EXTENSION: &str = "php";

/// Configuration for [`crate::extract::extract_all`].
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub site_url: String,
    pub source_extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

/// Configuration for [`crate::annotate::annotate_all`].
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    pub source_extension: String,
    /// Manual URL fragment rewritten in comments that are kept.
    pub manual_from: String,
    pub manual_to: String,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            manual_from: "//php.net/manual/en".to_string(),
            manual_to: "//php.net/manual/zh".to_string(),
        }
    }
}
