//! Lexicon-based polarity model for general English text.
//!
//! Each known word carries a polarity in `[-1, 1]` and a subjectivity in
//! `[0, 1]`. A text scores the mean over its matched words, after applying
//! two modifiers to the next sentiment word:
//!
//! - intensifiers ("very", "really", ...) multiply its polarity
//! - negations ("not", "never", ...) scale it by `-0.5`
//!
//! Texts with no matched word score `0.0` polarity and `0.0` subjectivity.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sentiscope_core::ConfigError;
use tracing::info;

use crate::polarity::{Polarity, ScoringError};

/// Factor applied to a negated sentiment word.
const NEGATION_FACTOR: f64 = -0.5;

/// (word, polarity, subjectivity)
const DEFAULT_WORDS: &[(&str, f64, f64)] = &[
    // Positive
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("brilliant", 0.9, 1.0),
    ("clean", 0.37, 0.69),
    ("cool", 0.35, 0.65),
    ("easy", 0.43, 0.83),
    ("enjoyed", 0.4, 0.5),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("favorite", 0.5, 1.0),
    ("fine", 0.42, 0.5),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 0.75),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("helpful", 0.3, 0.3),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("interesting", 0.5, 0.5),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("ok", 0.5, 0.5),
    ("okay", 0.5, 0.5),
    ("outstanding", 0.5, 0.5),
    ("perfect", 1.0, 1.0),
    ("positive", 0.23, 0.55),
    ("right", 0.29, 0.54),
    ("superb", 1.0, 1.0),
    ("useful", 0.3, 0.0),
    ("wonderful", 1.0, 1.0),
    // Negative
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("difficult", -0.5, 1.0),
    ("dirty", -0.6, 0.8),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("fake", -0.5, 1.0),
    ("hard", -0.29, 0.54),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("horrible", -1.0, 1.0),
    ("mediocre", -0.5, 0.6),
    ("nasty", -1.0, 1.0),
    ("negative", -0.3, 0.4),
    ("painful", -0.7, 0.9),
    ("pathetic", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("slow", -0.3, 0.39),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("useless", -0.5, 0.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

/// Negation words, in their normalized (apostrophe-free) form.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "cannot", "cant", "dont",
    "doesnt", "didnt", "isnt", "wasnt", "arent", "werent", "wont", "wouldnt", "shouldnt",
    "couldnt", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.8),
    ("highly", 1.5),
    ("incredibly", 1.6),
    ("quite", 1.1),
    ("really", 1.3),
    ("slightly", 0.5),
    ("so", 1.3),
    ("somewhat", 0.7),
    ("super", 1.5),
    ("too", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
];

/// Polarity and subjectivity of a single lexicon entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordSentiment {
    pub polarity: f64,
    #[serde(default)]
    pub subjectivity: f64,
}

/// Score of one text under a [`LexiconPolarity`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconScore {
    pub polarity: f64,
    pub subjectivity: f64,
    /// Number of sentiment words found.
    pub matched: usize,
}

/// Word-lexicon polarity model.
pub struct LexiconPolarity {
    words: HashMap<String, WordSentiment>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    /// Built-in general English lexicon.
    pub fn new() -> Self {
        let words = DEFAULT_WORDS
            .iter()
            .map(|&(word, polarity, subjectivity)| {
                (
                    word.to_string(),
                    WordSentiment {
                        polarity,
                        subjectivity,
                    },
                )
            })
            .collect();
        Self::with_words(words)
    }

    /// Custom word list with the built-in negations and intensifiers.
    pub fn with_words(words: HashMap<String, WordSentiment>) -> Self {
        let words = words
            .into_iter()
            .map(|(word, sentiment)| (word.to_lowercase(), sentiment))
            .collect();
        Self {
            words,
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|&(w, m)| (w.to_string(), m))
                .collect(),
        }
    }

    /// Parse a JSON object of `word -> {"polarity": f, "subjectivity": f}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let words: HashMap<String, WordSentiment> = serde_json::from_str(json)?;
        Ok(Self::with_words(words))
    }

    /// Load a JSON lexicon from disk. See [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_json_str(&json).map_err(|source| ConfigError::Lexicon {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), words = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }

    /// Number of sentiment words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<WordSentiment> {
        self.words.get(word).copied()
    }

    /// Score whitespace-separated lowercase tokens.
    pub fn analyze(&self, text: &str) -> LexiconScore {
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        let mut negated = false;
        let mut intensity = 1.0;

        for token in text.split_whitespace() {
            if self.negations.contains(token) {
                negated = true;
                continue;
            }
            if let Some(&multiplier) = self.intensifiers.get(token) {
                intensity *= multiplier;
                continue;
            }
            let Some(sentiment) = self.words.get(token) else {
                continue;
            };

            let mut polarity = sentiment.polarity * intensity;
            if negated {
                polarity *= NEGATION_FACTOR;
            }
            polarities.push(polarity);
            subjectivities.push(sentiment.subjectivity);

            negated = false;
            intensity = 1.0;
        }

        if polarities.is_empty() {
            return LexiconScore {
                polarity: 0.0,
                subjectivity: 0.0,
                matched: 0,
            };
        }

        LexiconScore {
            polarity: mean(&polarities).clamp(-1.0, 1.0),
            subjectivity: mean(&subjectivities).clamp(0.0, 1.0),
            matched: polarities.len(),
        }
    }
}

impl Polarity for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64, ScoringError> {
        Ok(self.analyze(text).polarity)
    }

    fn subjectivity(&self, text: &str) -> Option<f64> {
        Some(self.analyze(text).subjectivity)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
