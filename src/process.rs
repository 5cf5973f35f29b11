use crate::relevance::RelevanceScorer;
use crate::results::PageRecord;

/// Filters each page's content down to the blocks relevant to `prompt`.
///
/// Pages keeping zero blocks are dropped entirely; survivors carry the
/// fraction of their original blocks that matched. An empty prompt is a
/// pass-through so unfiltered crawls pay no scoring cost.
pub fn filter_by_prompt(
    pages: Vec<PageRecord>,
    prompt: &str,
    scorer: &RelevanceScorer,
) -> Vec<PageRecord> {
    if prompt.trim().is_empty() {
        return pages;
    }

    let mut filtered = Vec::new();
    for page in pages {
        let PageRecord {
            url,
            title,
            content,
            ..
        } = page;

        let original_count = content.len();
        let relevant: Vec<String> = content
            .into_iter()
            .filter(|block| scorer.is_relevant(block, prompt))
            .collect();

        if relevant.is_empty() {
            ::log::debug!("Dropping {}: no content relevant to prompt", url);
            continue;
        }

        // A page that kept blocks necessarily had blocks to begin with.
        let relevance_score = relevant.len() as f64 / original_count as f64;

        filtered.push(PageRecord {
            url,
            title,
            content: relevant,
            relevance_score: Some(relevance_score),
        });
    }

    filtered
}
