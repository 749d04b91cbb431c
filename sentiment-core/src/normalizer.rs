//! Label normalization
//!
//! Pretrained sentiment classifiers disagree on label vocabularies: binary
//! `POSITIVE`/`NEGATIVE`, 3-class variants with `NEUTRAL`, generic
//! `LABEL_0`..`LABEL_2` indices, and lower-case SST-style tags. The rules
//! below map all of them onto one signed scale.
//!
//! ```text
//! label (upper-cased)
//!   ├─ NEGATIVE* | LABEL_0  → -confidence
//!   ├─ POSITIVE* | LABEL_1  → +confidence
//!   ├─ NEUTRAL*  | LABEL_2  →  0.0
//!   ├─ *NEG*                → -confidence
//!   ├─ *POS*                → +confidence
//!   └─ anything else        →  0.0
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ClassifierResult, SignedScore};

/// Direction a label pushes the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Negative,
    Positive,
    Neutral,
}

impl Polarity {
    /// Signed score for a classifier confidence under this polarity.
    pub fn apply(self, confidence: f64) -> SignedScore {
        match self {
            Polarity::Negative => -confidence,
            Polarity::Positive => confidence,
            Polarity::Neutral => 0.0,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Negative => write!(f, "negative"),
            Polarity::Positive => write!(f, "positive"),
            Polarity::Neutral => write!(f, "neutral"),
        }
    }
}

/// A test against an upper-cased label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Contains(&'static str),
    Equals(&'static str),
}

impl LabelMatch {
    fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatch::Contains(needle) => label.contains(needle),
            LabelMatch::Equals(exact) => label == *exact,
        }
    }
}

/// Maps labels satisfying any of `any_of` to `polarity`.
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub any_of: &'static [LabelMatch],
    pub polarity: Polarity,
}

/// Rules in priority order; the first match wins.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        any_of: &[LabelMatch::Contains("NEGATIVE"), LabelMatch::Equals("LABEL_0")],
        polarity: Polarity::Negative,
    },
    LabelRule {
        any_of: &[LabelMatch::Contains("POSITIVE"), LabelMatch::Equals("LABEL_1")],
        polarity: Polarity::Positive,
    },
    LabelRule {
        any_of: &[LabelMatch::Contains("NEUTRAL"), LabelMatch::Equals("LABEL_2")],
        polarity: Polarity::Neutral,
    },
    LabelRule {
        any_of: &[LabelMatch::Contains("NEG")],
        polarity: Polarity::Negative,
    },
    LabelRule {
        any_of: &[LabelMatch::Contains("POS")],
        polarity: Polarity::Positive,
    },
];

/// Polarity for labels no rule recognizes.
pub const UNRECOGNIZED_POLARITY: Polarity = Polarity::Neutral;

/// Resolve a raw classifier label to a polarity, case-insensitively.
pub fn polarity_of(label: &str) -> Polarity {
    let label = label.to_uppercase();
    LABEL_RULES
        .iter()
        .find(|rule| rule.any_of.iter().any(|m| m.matches(&label)))
        .map(|rule| rule.polarity)
        .unwrap_or(UNRECOGNIZED_POLARITY)
}

/// Map one classifier result onto `[-1, 1]`. Never fails.
pub fn normalize(result: &ClassifierResult) -> SignedScore {
    polarity_of(&result.label).apply(result.confidence)
}
