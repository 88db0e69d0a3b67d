// Text normalization — the pure transform applied to every post's
// effective text before it is persisted.
//
// The pipeline, in order: strip newlines, remove URLs, tokenize by
// sentence then by word (so punctuation at sentence boundaries becomes its
// own token), lowercase, drop tokens with no letters, drop stopwords, stem
// what's left, and join with single spaces. No I/O, no side effects —
// empty input (or input that filters down to nothing) yields "".

use std::collections::HashSet;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// The normalization pipeline, with its stopword set, stemmer, and
/// patterns compiled once. Build one per run and reuse it for every post.
pub struct TextNormalizer {
    stop_words: HashSet<String>,
    stemmer: Stemmer,
    url_pattern: Regex,
    sentence_pattern: Regex,
    token_pattern: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        // The NLTK English stopword list — function words only, so content
        // words like "text" or "work" survive filtering. Lowercased to
        // match tokens post-lowercasing.
        let stop_words: HashSet<String> =
            get(LANGUAGE::English).into_iter().map(|w| w.to_lowercase()).collect();

        Self {
            stop_words,
            // Snowball English is the maintained form of the Porter stemmer.
            stemmer: Stemmer::create(Algorithm::English),
            // Maximal non-whitespace run starting at "http" — catches both
            // http:// and https:// links wherever they sit in the text.
            url_pattern: Regex::new(r"http\S+").expect("static regex"),
            // Sentence terminators are hard separators: word tokenization
            // never sees text spanning a sentence boundary.
            sentence_pattern: Regex::new(r"[.!?]+").expect("static regex"),
            // A token is either a run of word characters (any script, so
            // "café" stays whole) or a single other non-space character
            // (so "#cool" -> "#", "cool").
            token_pattern: Regex::new(r"[\p{L}\p{N}_']+|[^\p{L}\p{N}_'\s]").expect("static regex"),
        }
    }

    /// Run the full pipeline over one text, returning space-joined stems
    /// in original order.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace(['\n', '\r'], "");
        let text = self.url_pattern.replace_all(&text, "");

        let stems: Vec<String> = self
            .sentence_pattern
            .split(&text)
            .flat_map(|sentence| self.token_pattern.find_iter(sentence))
            .map(|token| token.as_str().to_lowercase())
            .filter(|token| token.chars().any(|c| c.is_ascii_alphabetic()))
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| self.stemmer.stem(&token).into_owned())
            .collect();

        stems.join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
