//! Offline keyword classifier.
//!
//! Counts whole-word hits from a positive and a negative mood vocabulary.
//! Used when no model endpoint is reachable or configured; fully
//! deterministic.

use regex::Regex;

use crate::error::{ConstructionError, InferenceError};
use crate::slot::Classify;
use crate::types::ClassifierResult;

const POSITIVE_TERMS: &[&str] = &[
    "better",
    "hopeful",
    "optimistic",
    "good",
    "great",
    "happy",
    "calm",
    "relaxed",
    "relieved",
    "grateful",
    "stable",
    "improving",
    "improved",
    "helping",
    "helpful",
    "motivated",
    "rested",
    "enjoy",
    "enjoying",
    "glad",
    "confident",
    "excellent",
    "wonderful",
    "love",
];

const NEGATIVE_TERMS: &[&str] = &[
    "depressed",
    "depression",
    "hopeless",
    "helpless",
    "worthless",
    "anxious",
    "anxiety",
    "worried",
    "worrying",
    "overwhelmed",
    "overwhelming",
    "awful",
    "terrible",
    "horrible",
    "sad",
    "lonely",
    "empty",
    "numb",
    "exhausted",
    "tired",
    "scared",
    "afraid",
    "panic",
    "angry",
    "hate",
    "miserable",
    "crying",
    "stressed",
    "bad",
    "low",
];

pub struct LexiconClassifier {
    /// `None` for an empty vocabulary
    positive: Option<Regex>,
    negative: Option<Regex>,
}

impl LexiconClassifier {
    /// Classifier over the built-in clinical mood vocabulary.
    pub fn new() -> Result<Self, ConstructionError> {
        Self::with_terms(POSITIVE_TERMS, NEGATIVE_TERMS)
    }

    pub fn with_terms(positive: &[&str], negative: &[&str]) -> Result<Self, ConstructionError> {
        Ok(Self {
            positive: word_matcher(positive)?,
            negative: word_matcher(negative)?,
        })
    }
}

fn word_matcher(terms: &[&str]) -> Result<Option<Regex>, ConstructionError> {
    if terms.is_empty() {
        return Ok(None);
    }
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
        .map(Some)
        .map_err(ConstructionError::Lexicon)
}

fn hits(matcher: &Option<Regex>, text: &str) -> f64 {
    matcher
        .as_ref()
        .map_or(0, |re| re.find_iter(text).count()) as f64
}

impl Classify for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<ClassifierResult, InferenceError> {
        let positive_hits = hits(&self.positive, text);
        let negative_hits = hits(&self.negative, text);
        let total = positive_hits + negative_hits;

        if total == 0.0 {
            return Ok(ClassifierResult::neutral());
        }

        let result = if negative_hits > positive_hits {
            ClassifierResult::new("NEGATIVE", negative_hits / total)
        } else if positive_hits > negative_hits {
            ClassifierResult::new("POSITIVE", positive_hits / total)
        } else {
            ClassifierResult::new(ClassifierResult::NEUTRAL_LABEL, 0.5)
        };
        Ok(result)
    }
}

impl std::fmt::Debug for LexiconClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconClassifier").finish_non_exhaustive()
    }
}
