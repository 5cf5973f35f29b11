use thiserror::Error;

/// Failures surfaced to callers of a top-level crawl.
///
/// Branch-level problems (a page that fails to render, a selector that matches
/// nothing, a statistical tier that cannot score) never appear here; they are
/// logged and terminate only the branch they occurred on.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL could not be parsed into a valid absolute URL. This is the
    /// one signal that distinguishes "nothing crawled" from "nothing matched".
    #[error("invalid seed URL: {url}")]
    InvalidSeed { url: String },

    #[error("failed to compile URL filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors from the WebDriver rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to connect to WebDriver at {webdriver_url}: {source}")]
    Connect {
        webdriver_url: String,
        source: fantoccini::error::NewSessionError,
    },

    #[error("navigation failed for {url}: {source}")]
    Navigation {
        url: String,
        source: fantoccini::error::CmdError,
    },

    #[error("page render timed out for {url}")]
    Timeout { url: String },

    #[error("WebDriver session lost while rendering {url}")]
    SessionLost { url: String },
}

/// Errors building the content extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// Errors from the statistical relevance tier. The scorer maps these to a
/// tier miss and falls through to the lexical tiers.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("no scoreable terms left after stopword removal")]
    EmptyVocabulary,
}
