use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// The structured extraction result for one rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Final URL after any redirects
    pub url: String,

    /// Page title, empty when the document has none
    pub title: String,

    /// Extracted text blocks in category-then-document order
    pub content: Vec<String>,

    /// Fraction of the original blocks judged relevant; present only when
    /// prompt filtering ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl PageRecord {
    pub fn new(url: String, title: String, content: Vec<String>) -> Self {
        Self {
            url,
            title,
            content,
            relevance_score: None,
        }
    }
}

/// Writes crawl results to `path` as pretty-printed JSON, creating parent
/// directories as needed. Non-ASCII characters are written literally.
pub fn save_results(pages: &[PageRecord], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(pages)?;
    fs::write(path, json)?;

    ::log::info!("Saved {} pages to {}", pages.len(), path.display());
    Ok(())
}
