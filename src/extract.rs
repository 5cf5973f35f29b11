use crate::error::ExtractError;
use crate::results::PageRecord;
use scraper::{Html, Selector};

/// Tag groups searched for content, in the order their text lands in a record:
/// text, headings, lists, tables.
const TEXT_TAGS: &[&str] = &["p", "div", "section", "article"];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const LIST_TAGS: &[&str] = &["ul", "ol"];
const TABLE_TAGS: &[&str] = &["table"];

/// One rendered page's structured content plus its outbound links.
#[derive(Debug)]
pub struct Extraction {
    pub record: PageRecord,

    /// Raw href values found on the page, handed to the crawl controller.
    /// Never part of the record's content.
    pub links: Vec<String>,
}

/// Pulls categorized text blocks and anchor targets out of rendered HTML.
#[derive(Debug)]
pub struct ContentExtractor {
    min_block_chars: usize,
    title: Selector,
    anchors: Selector,
    content: Vec<Selector>,
}

impl ContentExtractor {
    /// Blocks must exceed `min_block_chars` characters to survive; shorter
    /// fragments are nav labels and button text.
    pub fn new(min_block_chars: usize) -> Result<Self, ExtractError> {
        let mut content = Vec::new();
        for group in [TEXT_TAGS, HEADING_TAGS, LIST_TAGS, TABLE_TAGS] {
            for tag in group {
                content.push(parse_selector(tag)?);
            }
        }

        Ok(Self {
            min_block_chars,
            title: parse_selector("title")?,
            anchors: parse_selector("a")?,
            content,
        })
    }

    pub fn extract(&self, html: &str, url: &str) -> Extraction {
        let doc = Html::parse_document(html);

        let title = doc
            .select(&self.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        // Category groups in fixed order, tags in listed order, elements in
        // document order. Nested matches extract twice; there is no dedup.
        let mut content = Vec::new();
        for selector in &self.content {
            for element in doc.select(selector) {
                let text = normalize_text(element.text());
                if text.chars().count() > self.min_block_chars {
                    content.push(text);
                }
            }
        }

        let links: Vec<String> = doc
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(|href| href.to_string())
            .collect();

        ::log::debug!(
            "Extracted {} blocks and {} links from {}",
            content.len(),
            links.len(),
            url
        );

        Extraction {
            record: PageRecord::new(url.to_string(), title, content),
            links,
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Joins an element's text nodes and collapses whitespace runs.
fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(20).unwrap()
    }

    #[test]
    fn test_title_extraction() {
        let html = "<html><head><title> My Page </title></head><body></body></html>";
        let extraction = extractor().extract(html, "https://example.com/");
        assert_eq!(extraction.record.title, "My Page");

        let untitled = extractor().extract("<html><body></body></html>", "https://example.com/");
        assert_eq!(untitled.record.title, "");
    }

    #[test]
    fn test_block_length_boundary() {
        // Exactly 20 characters: excluded. 21: included.
        let twenty = "a".repeat(20);
        let twenty_one = "b".repeat(21);
        let html = format!("<html><body><p>{twenty}</p><p>{twenty_one}</p></body></html>");

        let extraction = extractor().extract(&html, "https://example.com/");
        assert_eq!(extraction.record.content, vec![twenty_one]);
    }

    #[test]
    fn test_category_order_over_document_order() {
        // The heading precedes the paragraph in the document, but the text
        // group is processed before the headings group.
        let html = "<html><body>\
                    <h1>A heading of more than twenty characters</h1>\
                    <p>A paragraph of more than twenty characters</p>\
                    </body></html>";

        let extraction = extractor().extract(html, "https://example.com/");
        assert_eq!(
            extraction.record.content,
            vec![
                "A paragraph of more than twenty characters".to_string(),
                "A heading of more than twenty characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_elements_extract_twice() {
        let html = "<html><body>\
                    <div><p>Nested paragraph text longer than twenty characters</p></div>\
                    </body></html>";

        let extraction = extractor().extract(html, "https://example.com/");
        // Once for the p match, once for the enclosing div
        assert_eq!(extraction.record.content.len(), 2);
        assert_eq!(extraction.record.content[0], extraction.record.content[1]);
    }

    #[test]
    fn test_whitespace_normalized_in_blocks() {
        let html = "<html><body><p>spread   across\n  several\t lines of markup</p></body></html>";
        let extraction = extractor().extract(html, "https://example.com/");
        assert_eq!(
            extraction.record.content,
            vec!["spread across several lines of markup".to_string()]
        );
    }

    #[test]
    fn test_links_collected_separately() {
        let html = "<html><body>\
                    <p>Enough text to pass the length filter here</p>\
                    <a href=\"/about\">About</a>\
                    <a href=\"https://external.example/\">Ext</a>\
                    <a href=\"\">empty</a>\
                    <a>no href</a>\
                    </body></html>";

        let extraction = extractor().extract(html, "https://example.com/");
        assert_eq!(
            extraction.links,
            vec!["/about".to_string(), "https://external.example/".to_string()]
        );
        // Links never leak into content
        assert_eq!(extraction.record.content.len(), 1);
    }

    #[test]
    fn test_lists_and_tables_extracted() {
        let html = "<html><body>\
                    <ul><li>first list entry</li><li>second list entry</li></ul>\
                    <table><tr><td>tabular data cell contents</td></tr></table>\
                    </body></html>";

        let extraction = extractor().extract(html, "https://example.com/");
        assert_eq!(
            extraction.record.content,
            vec![
                "first list entry second list entry".to_string(),
                "tabular data cell contents".to_string(),
            ]
        );
    }
}
