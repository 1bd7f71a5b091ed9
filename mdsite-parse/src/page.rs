//! Page-level helpers: title extraction and template filling.

use crate::blocks::markdown_to_blocks;
use crate::error::{Error, Result};

/// Placeholder replaced with the page title.
pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
/// Placeholder replaced with the rendered document.
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// Text of the first `# ` heading block in `markdown`.
pub fn extract_title(markdown: &str) -> Result<String> {
    markdown_to_blocks(&markdown.replace("\r\n", "\n"))
        .into_iter()
        .find_map(|block| {
            if block.contains('\n') {
                return None;
            }
            block.strip_prefix("# ").map(|t| t.trim().to_string())
        })
        .ok_or(Error::MissingTitle)
}

/// An HTML page template with `{{ Title }}` and `{{ Content }}` slots.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    basepath: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            basepath: "/".to_string(),
        }
    }

    /// Serve the site from a sub-path; root-relative `href` and `src`
    /// attributes are rewritten to start with `basepath`.
    pub fn with_basepath(mut self, basepath: impl Into<String>) -> Self {
        let mut basepath = basepath.into();
        if !basepath.starts_with('/') {
            basepath.insert(0, '/');
        }
        if !basepath.ends_with('/') {
            basepath.push('/');
        }
        self.basepath = basepath;
        self
    }

    /// Fill both placeholders, then apply the basepath.
    pub fn render(&self, title: &str, content: &str) -> String {
        let page = self
            .source
            .replace(TITLE_PLACEHOLDER, title)
            .replace(CONTENT_PLACEHOLDER, content);

        if self.basepath == "/" {
            return page;
        }
        page.replace("href=\"/", &format!("href=\"{}", self.basepath))
            .replace("src=\"/", &format!("src=\"{}", self.basepath))
    }
}
