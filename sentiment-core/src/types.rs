//! Core value types shared by the normalizer, slots and ensemble.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Normalized output of one classifier for one text, in `[-1.0, 1.0]`.
///
/// The sign carries polarity and the magnitude carries confidence. Exactly
/// `0.0` means neutral or unavailable.
pub type SignedScore = f64;

/// Identifier of one of the three ensemble slots.
///
/// The declaration order is the score order of [`EnsembleResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    /// Mental-health specialised model; the only slot with a fallback
    MentalHealth,
    /// General 3-class sentiment model trained on social media text
    Social,
    /// Binary sentiment model fine-tuned on the Stanford Sentiment Treebank
    Treebank,
}

impl SlotId {
    /// Position of this slot in an [`EnsembleResult`].
    pub fn index(&self) -> usize {
        match self {
            SlotId::MentalHealth => 0,
            SlotId::Social => 1,
            SlotId::Treebank => 2,
        }
    }

    /// Model identifier used when no configuration overrides it
    pub fn default_model(&self) -> &'static str {
        match self {
            SlotId::MentalHealth => "mental/mental-bert-base-uncased",
            SlotId::Social => "cardiffnlp/twitter-roberta-base-sentiment-latest",
            SlotId::Treebank => "textattack/bert-base-uncased-SST-2",
        }
    }

    /// All slots in ensemble order
    pub fn all() -> &'static [SlotId; 3] {
        &[SlotId::MentalHealth, SlotId::Social, SlotId::Treebank]
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotId::MentalHealth => write!(f, "mental_health"),
            SlotId::Social => write!(f, "social"),
            SlotId::Treebank => write!(f, "treebank"),
        }
    }
}

/// One classifier's answer for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    /// Raw label from the classifier's own vocabulary
    pub label: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl ClassifierResult {
    /// Label used for synthesized neutral results.
    pub const NEUTRAL_LABEL: &'static str = "NEUTRAL";

    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Stand-in for an unavailable or failed classifier. Normalizes to `0.0`.
    pub fn neutral() -> Self {
        Self {
            label: Self::NEUTRAL_LABEL.to_string(),
            confidence: 0.0,
        }
    }
}

/// Ordered score triple, one [`SignedScore`] per slot in [`SlotId::all`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnsembleResult([SignedScore; 3]);

impl EnsembleResult {
    pub fn new(mental_health: SignedScore, social: SignedScore, treebank: SignedScore) -> Self {
        Self([mental_health, social, treebank])
    }

    /// `(0.0, 0.0, 0.0)`
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotId) -> SignedScore {
        self.0[slot.index()]
    }

    pub fn scores(&self) -> [SignedScore; 3] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = SignedScore> + '_ {
        self.0.iter().copied()
    }

    /// Arithmetic mean of the three scores.
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }
}

impl Index<usize> for EnsembleResult {
    type Output = SignedScore;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Index<SlotId> for EnsembleResult {
    type Output = SignedScore;

    fn index(&self, slot: SlotId) -> &Self::Output {
        &self.0[slot.index()]
    }
}

impl From<EnsembleResult> for (SignedScore, SignedScore, SignedScore) {
    fn from(result: EnsembleResult) -> Self {
        let [a, b, c] = result.0;
        (a, b, c)
    }
}

impl From<[SignedScore; 3]> for EnsembleResult {
    fn from(scores: [SignedScore; 3]) -> Self {
        Self(scores)
    }
}
