// file: src/engine/analyzer.rs
// description: text analysis chains available to the index
// reference: https://docs.rs/tantivy/latest/tantivy/tokenizer/

use serde::{Deserialize, Serialize};
use std::fmt;
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenizerManager, WhitespaceTokenizer,
};

const MAX_TOKEN_LENGTH: usize = 40;

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "it", "it's", "its", "itself", "let's", "me", "more",
    "most", "my", "myself", "nor", "of", "on", "once", "only", "or", "other", "ought", "our",
    "ours", "ourselves", "out", "over", "own", "same", "she", "she'd", "she'll", "she's",
    "should", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "we", "we'd", "we'll", "we're", "we've", "were", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "would", "you",
    "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

pub fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Splits on whitespace only, case preserved.
    Whitespace,
    /// Splits at non-alphanumeric characters and lowercases.
    Simple,
    /// `Simple` plus stop-word removal.
    Stop,
    /// Lowercased word tokens, overly long tokens dropped, stop words removed.
    Standard,
    /// `Standard` followed by English stemming.
    #[default]
    English,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 5] = [
        AnalyzerKind::Whitespace,
        AnalyzerKind::Simple,
        AnalyzerKind::Stop,
        AnalyzerKind::Standard,
        AnalyzerKind::English,
    ];

    /// Name under which the chain is registered and recorded in the schema.
    pub fn tokenizer_name(self) -> &'static str {
        match self {
            AnalyzerKind::Whitespace => "cran_whitespace",
            AnalyzerKind::Simple => "cran_simple",
            AnalyzerKind::Stop => "cran_stop",
            AnalyzerKind::Standard => "cran_standard",
            AnalyzerKind::English => "cran_english",
        }
    }

    pub fn build(self, stop_words: &[String]) -> TextAnalyzer {
        let stop_filter = || StopWordFilter::remove(stop_words.iter().cloned());

        match self {
            AnalyzerKind::Whitespace => {
                TextAnalyzer::builder(WhitespaceTokenizer::default()).build()
            }
            AnalyzerKind::Simple => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .build(),
            AnalyzerKind::Stop => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(stop_filter())
                .build(),
            AnalyzerKind::Standard => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .filter(LowerCaser)
                .filter(stop_filter())
                .build(),
            AnalyzerKind::English => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .filter(LowerCaser)
                .filter(stop_filter())
                .filter(Stemmer::new(Language::English))
                .build(),
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalyzerKind::Whitespace => "whitespace",
            AnalyzerKind::Simple => "simple",
            AnalyzerKind::Stop => "stop",
            AnalyzerKind::Standard => "standard",
            AnalyzerKind::English => "english",
        };
        f.write_str(name)
    }
}

/// Registers every chain so an index built with any of them can be queried.
pub fn register_analyzers(manager: &TokenizerManager, stop_words: &[String]) {
    for kind in AnalyzerKind::ALL {
        manager.register(kind.tokenizer_name(), kind.build(stop_words));
    }
}
