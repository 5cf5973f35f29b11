use crate::error::ScoreError;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Default minimum cosine similarity for the statistical tier.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// English stopwords kept out of keyword sets and the TF-IDF vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just",
    "ll", "me", "mightn", "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not",
    "now", "o", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "shan", "she", "should", "shouldn", "so", "some",
    "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
    "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won", "would", "wouldn", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Decides whether a piece of text is relevant to a prompt.
///
/// Three tiers, first hit wins: cosine similarity in a TF-IDF space built from
/// the prompt/text pair, keyword-set overlap, then partial keyword
/// containment. The lexical tiers back up the statistical one, which gets
/// noisy on a two-document corpus.
#[derive(Debug)]
pub struct RelevanceScorer {
    threshold: f64,
    non_word: Regex,
    whitespace: Regex,
    stop_words: HashSet<&'static str>,
}

impl RelevanceScorer {
    pub fn new(threshold: f64) -> Result<Self, regex::Error> {
        Ok(Self {
            threshold,
            non_word: Regex::new(r"[^\w\s]")?,
            whitespace: Regex::new(r"\s+")?,
            stop_words: STOP_WORDS.iter().copied().collect(),
        })
    }

    pub fn is_relevant(&self, text: &str, prompt: &str) -> bool {
        let text = self.preprocess(text);
        let prompt = self.preprocess(prompt);

        if text.is_empty() || prompt.is_empty() {
            return false;
        }

        // Tier 1: statistical similarity. A scoring failure is a tier miss,
        // not a crawl failure.
        match self.tfidf_similarity(&prompt, &text) {
            Ok(similarity) if similarity >= self.threshold => return true,
            Ok(_) => {}
            Err(ScoreError::EmptyVocabulary) => {
                ::log::debug!("Statistical tier skipped: empty vocabulary");
            }
        }

        // Tier 2: keyword overlap
        let prompt_keywords = self.keywords(&prompt);
        let text_keywords = self.keywords(&text);
        if prompt_keywords.intersection(&text_keywords).next().is_some() {
            return true;
        }

        // Tier 3: partial containment between keyword pairs
        for p in &prompt_keywords {
            for t in &text_keywords {
                if (p.chars().count() > 3 && t.contains(p.as_str()))
                    || (t.chars().count() > 3 && p.contains(t.as_str()))
                {
                    return true;
                }
            }
        }

        false
    }

    /// Lowercases, strips every non-word character to a space, and collapses
    /// whitespace runs.
    pub fn preprocess(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = self.non_word.replace_all(&lowered, " ");
        self.whitespace
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }

    /// Keyword set for the lexical tiers: no stopwords, no tokens of one or
    /// two characters, no purely numeric tokens.
    pub fn keywords(&self, text: &str) -> HashSet<String> {
        text.split_whitespace()
            .filter(|word| !self.stop_words.contains(*word))
            .filter(|word| word.chars().count() > 2)
            .filter(|word| !word.chars().all(|c| c.is_numeric()))
            .map(|word| word.to_string())
            .collect()
    }

    /// Cosine similarity between two preprocessed documents in a TF-IDF space
    /// built from just that pair, with smoothed inverse document frequencies.
    pub fn tfidf_similarity(&self, a: &str, b: &str) -> Result<f64, ScoreError> {
        let docs = [self.terms(a), self.terms(b)];

        let mut vocabulary: Vec<&str> = docs.iter().flatten().map(String::as_str).collect();
        vocabulary.sort_unstable();
        vocabulary.dedup();
        if vocabulary.is_empty() {
            return Err(ScoreError::EmptyVocabulary);
        }

        let counts: Vec<HashMap<&str, usize>> = docs
            .iter()
            .map(|terms| {
                let mut tf = HashMap::new();
                for term in terms {
                    *tf.entry(term.as_str()).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let n_docs = docs.len() as f64;
        let vectors: Vec<Vec<f64>> = counts
            .iter()
            .map(|tf| {
                vocabulary
                    .iter()
                    .map(|term| {
                        let count = *tf.get(term).unwrap_or(&0) as f64;
                        let df = counts.iter().filter(|c| c.contains_key(term)).count() as f64;
                        let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
                        count * idf
                    })
                    .collect()
            })
            .collect();

        Ok(cosine_similarity(&vectors[0], &vectors[1]))
    }

    /// Vocabulary terms for the statistical tier: at least two characters and
    /// not a stopword.
    fn terms(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter(|word| word.chars().count() >= 2)
            .filter(|word| !self.stop_words.contains(*word))
            .map(|word| word.to_string())
            .collect()
    }
}

/// Cosine similarity between two equal-length vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
