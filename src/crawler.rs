use crate::config::ScraperConfig;
use crate::error::CrawlError;
use crate::extract::ContentExtractor;
use crate::process::filter_by_prompt;
use crate::relevance::RelevanceScorer;
use crate::render::Renderer;
use crate::results::PageRecord;
use crate::urls::{self, LinkFilter};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Visitation state for one crawl: the origin fixed from the seed plus every
/// URL already dispatched for rendering.
#[derive(Debug)]
pub struct CrawlSession {
    base_origin: Url,
    visited: HashSet<String>,
}

impl CrawlSession {
    /// Fixes the crawl origin from the seed URL.
    pub fn new(seed: &Url) -> Self {
        Self {
            base_origin: seed.clone(),
            visited: HashSet::new(),
        }
    }

    pub fn base_origin(&self) -> &Url {
        &self.base_origin
    }

    /// Records `url` as visited, returning false when it already was.
    /// Checking and marking are one operation, so no URL is ever dispatched
    /// for rendering twice within a session.
    fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }
}

/// Shared flag for stopping a crawl between render dispatches. In-flight
/// renders finish; nothing new is dispatched once the flag is set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Depth-bounded, origin-scoped crawl controller.
///
/// Traversal runs over an explicit work stack of `(url, depth budget)` pairs
/// rather than the call stack; children are pushed in reverse document order
/// so pages come back in depth-first discovery order, seed first.
pub struct Scraper<R> {
    renderer: R,
    extractor: ContentExtractor,
    scorer: RelevanceScorer,
    link_filter: LinkFilter,
    session: Option<CrawlSession>,
    cancel: CancelToken,
}

impl<R: Renderer> Scraper<R> {
    pub fn new(config: &ScraperConfig, renderer: R) -> Result<Self, CrawlError> {
        Ok(Self {
            renderer,
            extractor: ContentExtractor::new(config.min_block_chars)?,
            scorer: RelevanceScorer::new(config.relevance_threshold)?,
            link_filter: LinkFilter::new(&config.exclude_patterns)?,
            session: None,
            cancel: CancelToken::new(),
        })
    }

    /// Handle for stopping this crawl from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Drops the visited-set and origin so the next scrape starts fresh.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Crawls from `seed`, following same-origin links through at most
    /// `depth` hops, and returns pages in depth-first discovery order. With a
    /// prompt, content is filtered down to relevant blocks before returning.
    ///
    /// A depth of 0 fetches exactly the seed page. Re-scraping a URL already
    /// visited in this session yields an empty result, not an error; only an
    /// unparseable seed is reported as a failure.
    pub async fn scrape(
        &mut self,
        seed: &str,
        prompt: Option<&str>,
        depth: u32,
    ) -> Result<Vec<PageRecord>, CrawlError> {
        let seed_url = self.resolve_seed(seed)?;
        let mut session = self
            .session
            .take()
            .expect("session is set by resolve_seed");

        let mut stack = vec![(seed_url, depth)];
        let mut pages = Vec::new();

        while let Some((url, depth_left)) = stack.pop() {
            if self.cancel.is_cancelled() {
                ::log::info!("Crawl cancelled with {} pages collected", pages.len());
                break;
            }

            if !session.mark_visited(&url) {
                continue;
            }

            ::log::info!("Scraping {} (depth budget {})", url, depth_left);

            let rendered = match self.renderer.render(&url).await {
                Ok(rendered) => rendered,
                Err(e) => {
                    // One unreachable page never voids the rest of the crawl
                    ::log::warn!("Render failed for {}: {}", url, e);
                    continue;
                }
            };

            let extraction = self
                .extractor
                .extract(&rendered.html, rendered.final_url.as_str());

            if depth_left > 0 {
                // Reverse push keeps the traversal depth-first in document
                // order once the stack unwinds.
                for link in extraction.links.iter().rev() {
                    let Some(next) = urls::normalize(link, session.base_origin()) else {
                        continue;
                    };
                    if !self.link_filter.should_visit(&next, session.base_origin()) {
                        continue;
                    }
                    if session.is_visited(&next) {
                        continue;
                    }
                    stack.push((next, depth_left - 1));
                }
            }

            pages.push(extraction.record);
        }

        self.session = Some(session);

        let pages = match prompt {
            Some(prompt) => filter_by_prompt(pages, prompt, &self.scorer),
            None => pages,
        };

        Ok(pages)
    }

    /// First call fixes the session origin from the seed; later calls resolve
    /// the seed against the existing origin.
    fn resolve_seed(&mut self, seed: &str) -> Result<Url, CrawlError> {
        match &self.session {
            Some(session) => urls::normalize(seed, session.base_origin())
                .filter(urls::is_valid)
                .ok_or_else(|| CrawlError::InvalidSeed {
                    url: seed.to_string(),
                }),
            None => {
                let parsed = Url::parse(seed)
                    .ok()
                    .filter(urls::is_valid)
                    .ok_or_else(|| CrawlError::InvalidSeed {
                        url: seed.to_string(),
                    })?;
                self.session = Some(CrawlSession::new(&parsed));
                Ok(parsed)
            }
        }
    }
}
