use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::relevance;

/// Configuration for the scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Budget for a page to load before the render is abandoned
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Settle time after navigation so client-side rendering can finish
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    /// Minimum cosine similarity for the statistical relevance tier
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,

    /// Text blocks at or below this many characters are dropped as noise
    #[serde(default = "default_min_block_chars")]
    pub min_block_chars: usize,

    /// Extra regex patterns for links to skip, on top of the built-in
    /// asset-extension list
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            page_load_timeout_secs: default_page_load_timeout(),
            settle_delay_secs: default_settle_delay(),
            relevance_threshold: default_relevance_threshold(),
            min_block_chars: default_min_block_chars(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default page load budget in seconds
fn default_page_load_timeout() -> u64 {
    20
}

/// Default settle delay in seconds
fn default_settle_delay() -> u64 {
    3
}

fn default_relevance_threshold() -> f64 {
    relevance::DEFAULT_THRESHOLD
}

fn default_min_block_chars() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ScraperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.page_load_timeout_secs, 20);
        assert_eq!(config.settle_delay_secs, 3);
        assert_eq!(config.min_block_chars, 20);
        assert!(config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_partial_override() {
        let config: ScraperConfig = serde_json::from_str(
            r#"{"webdriver_url": "http://localhost:9515", "relevance_threshold": 0.2}"#,
        )
        .unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.relevance_threshold, 0.2);
        assert_eq!(config.settle_delay_secs, 3);
    }
}
