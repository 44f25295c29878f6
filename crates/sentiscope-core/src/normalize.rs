//! Text normalization ahead of sentiment scoring.
//!
//! Converts arbitrary user text into a canonical token sequence so the
//! polarity model only sees sentiment-bearing words.
//!
//! Input: `"Check this out: http://example.com/x WWW.test.org!! "`
//! Output: `"check out"`
//!
//! # Algorithm
//!
//! 1. Lowercase the whole input
//! 2. Delete every `http` run up to the next whitespace
//! 3. Delete every `www.` run up to the next whitespace
//! 4. Delete every character that is neither an ASCII letter nor whitespace
//! 5. Split on whitespace and drop stopwords
//! 6. Join the surviving tokens with a single space
//!
//! Steps 4 and 5 can glue letters into a fresh `http` token (`"ht!tpx"`
//! becomes `"httpx"`), so the pass repeats until its output is stable.
//! Normal text is stable after the first pass.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ConfigError;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static WWW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"www\.\S+").unwrap());

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// English function words removed before scoring.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "is", "are", "it", "in", "on", "at", "for", "this", "that", "with", "to",
    "from", "we", "you", "me", "he", "she", "they", "them",
];

/// Normalizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Tokens dropped after cleaning. Matched exactly against lowercase tokens.
    pub stopwords: BTreeSet<String>,
}

impl Default for NormalizerConfig {
    /// The 21 words in [`DEFAULT_STOPWORDS`].
    fn default() -> Self {
        Self::with_stopwords(DEFAULT_STOPWORDS)
    }
}

impl NormalizerConfig {
    /// Build a config from an explicit stopword list.
    ///
    /// Entries are trimmed and lowercased; blank entries are ignored.
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords }
    }

    /// Parse a newline-separated stopword list. Blank lines and `#` comments are skipped.
    pub fn parse_stopword_list(text: &str) -> Self {
        Self::with_stopwords(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a stopword list from disk. See [`parse_stopword_list`](Self::parse_stopword_list).
    pub fn from_stopword_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse_stopword_list(&text);
        debug!(path = %path.display(), count = config.stopwords.len(), "loaded stopword list");
        Ok(config)
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

/// Deterministic text cleaner.
///
/// Output is empty or lowercase ASCII words separated by single spaces, and
/// `normalize(normalize(x)) == normalize(x)` for every input.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize raw text. Never fails; may return an empty string.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.clean_once(raw);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let without_urls = URL_RE.replace_all(&lower, "");
        let without_www = WWW_RE.replace_all(&without_urls, "");

        let letters: String = without_www
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();

        // split_whitespace also absorbs irregular runs left by the deletions above.
        letters
            .split_whitespace()
            .filter(|token| !self.config.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Normalize with the default stopword list.
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    static SHAPE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^([a-z]+( [a-z]+)*)?$").unwrap());

    /// Inputs covering URLs, punctuation, unicode, odd whitespace and spliced tokens.
    const CORPUS: &[&str] = &[
        "",
        "   ",
        "Check this out: http://example.com/x WWW.test.org!! ",
        "I love this product and it is great",
        "The the THE tHe",
        "12345 !!! ??? 😀😀",
        "Visit https://t.co/abc?x=1 or www.site.com/path today",
        "tabs\tand\nnewlines\r\nbetween   words",
        "ht!tpx",
        "xhtt1py",
        "thehttpx",
        "w!ww.x and more",
        "Café naïve résumé",
        "Don't stop believin'",
        "http",
        "httpwww.x",
        "IN ON AT for With",
        "ＦＵＬＬ width Ｌetters",
        "a\u{00a0}b\u{2003}c",
    ];

    #[test]
    fn spec_example_with_urls() {
        assert_eq!(
            normalize("Check this out: http://example.com/x WWW.test.org!! "),
            "check out"
        );
    }

    #[test]
    fn end_to_end_sentence() {
        // "i" is not in the stopword list.
        assert_eq!(
            normalize("I love this product and it is great"),
            "i love product great"
        );
    }

    #[test]
    fn lowercases_everything() {
        assert_eq!(normalize("GREAT Movie"), "great movie");
    }

    #[test]
    fn strips_http_and_https_urls() {
        assert_eq!(normalize("see http://a.b/c and https://x.y now"), "see now");
    }

    #[test]
    fn strips_www_urls() {
        assert_eq!(normalize("go to www.example.com please"), "go please");
    }

    #[test]
    fn bare_http_word_survives() {
        // `http\S+` needs at least one more character.
        assert_eq!(normalize("http"), "http");
    }

    #[test]
    fn url_inside_token_cuts_the_tail() {
        assert_eq!(normalize("prefixhttp://x.y"), "prefix");
    }

    #[test]
    fn strips_digits_punctuation_and_emoji() {
        assert_eq!(normalize("5 stars!!! 😀 amazing, truly."), "stars amazing truly");
    }

    #[test]
    fn apostrophes_join_words() {
        assert_eq!(normalize("don't"), "dont");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(normalize("Café naïve"), "caf nave");
    }

    #[test]
    fn only_stopwords_is_empty() {
        assert_eq!(normalize("The and IS are it in on at"), "");
    }

    #[test]
    fn no_letters_is_empty() {
        assert_eq!(normalize("123 456 !!! ..."), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn collapses_irregular_whitespace() {
        assert_eq!(normalize("  good\t\tbad \n ugly  "), "good bad ugly");
    }

    #[test]
    fn all_default_stopwords_removed() {
        let text = DEFAULT_STOPWORDS.join(" ");
        assert_eq!(normalize(&text), "");
        assert_eq!(DEFAULT_STOPWORDS.len(), 21);
    }

    #[test]
    fn stopword_match_is_whole_token() {
        assert_eq!(normalize("theory island there"), "theory island there");
    }

    #[test]
    fn spliced_url_is_removed() {
        assert_eq!(normalize("ht!tpx"), "");
        assert_eq!(normalize("xhtt1py"), "x");
    }

    #[test]
    fn stopword_exposed_by_url_removal() {
        assert_eq!(normalize("thehttpx"), "");
    }

    #[test]
    fn output_shape() {
        for input in CORPUS {
            let out = normalize(input);
            assert!(SHAPE_RE.is_match(&out), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn idempotent() {
        for input in CORPUS {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn deterministic() {
        for input in CORPUS {
            assert_eq!(normalize(input), normalize(input));
        }
    }

    #[test]
    fn custom_stopwords_replace_defaults() {
        let normalizer = Normalizer::new(NormalizerConfig::with_stopwords(["product", " I "]));
        assert_eq!(normalizer.normalize("I love this product"), "love this");
    }

    #[test]
    fn empty_stopword_list_keeps_everything() {
        let normalizer = Normalizer::new(NormalizerConfig::with_stopwords(Vec::<String>::new()));
        assert_eq!(normalizer.normalize("The end"), "the end");
    }

    #[test]
    fn parse_stopword_list_skips_comments_and_blanks() {
        let config = NormalizerConfig::parse_stopword_list("# comment\n\n  Foo \nbar\n#baz\n");
        let words: Vec<&str> = config.stopwords.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["bar", "foo"]);
    }

    #[test]
    fn stopword_file_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stopwords.txt");
        std::fs::write(&path, "very\nreally\n").unwrap();

        let config = NormalizerConfig::from_stopword_file(&path).unwrap();
        let normalizer = Normalizer::new(config);
        assert_eq!(normalizer.normalize("Really very good"), "good");
    }

    #[test]
    fn missing_stopword_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = NormalizerConfig::from_stopword_file(&tmp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
