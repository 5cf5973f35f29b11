// Re-export modules
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod process;
pub mod relevance;
pub mod render;
pub mod results;
pub mod urls;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use crawler::{CancelToken, CrawlSession, Scraper};
pub use error::{CrawlError, ExtractError, RenderError, ScoreError};
pub use render::{RenderedPage, Renderer, WebDriverRenderer};
pub use results::PageRecord;
