//! Interpretation of signed scores as mood categories.
//!
//! ```text
//! -1.0 ── -0.6 ── -0.3 ──── +0.3 ── +0.6 ── +1.0
//!  very neg │  neg  │ neutral  │  pos  │ very pos
//! ```

use serde::{Deserialize, Serialize};

use crate::types::SignedScore;

/// Five-band reading of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBand {
    /// Severe distress indicators
    VeryNegative,
    /// Mild to moderate distress
    Negative,
    /// Balanced emotional state
    Neutral,
    /// Good mood
    Positive,
    /// Excellent mood
    VeryPositive,
}

impl MoodBand {
    pub fn from_score(score: SignedScore) -> Self {
        if score <= -0.6 {
            MoodBand::VeryNegative
        } else if score <= -0.3 {
            MoodBand::Negative
        } else if score < 0.3 {
            MoodBand::Neutral
        } else if score < 0.6 {
            MoodBand::Positive
        } else {
            MoodBand::VeryPositive
        }
    }

    /// Collapse to the coarse three-way [`Mood`].
    pub fn mood(&self) -> Mood {
        match self {
            MoodBand::VeryNegative | MoodBand::Negative => Mood::Negative,
            MoodBand::Neutral => Mood::Neutral,
            MoodBand::Positive | MoodBand::VeryPositive => Mood::Positive,
        }
    }
}

impl std::fmt::Display for MoodBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodBand::VeryNegative => write!(f, "very negative"),
            MoodBand::Negative => write!(f, "negative"),
            MoodBand::Neutral => write!(f, "neutral"),
            MoodBand::Positive => write!(f, "positive"),
            MoodBand::VeryPositive => write!(f, "very positive"),
        }
    }
}

/// Three-way mood used for summary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Negative,
    Neutral,
    Positive,
}

impl Mood {
    /// `< -0.3` negative, `> 0.3` positive, otherwise neutral.
    pub fn from_score(score: SignedScore) -> Self {
        if score < -0.3 {
            Mood::Negative
        } else if score > 0.3 {
            Mood::Positive
        } else {
            Mood::Neutral
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Negative => write!(f, "NEGATIVE"),
            Mood::Neutral => write!(f, "NEUTRAL"),
            Mood::Positive => write!(f, "POSITIVE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(MoodBand::from_score(-1.0), MoodBand::VeryNegative);
        assert_eq!(MoodBand::from_score(-0.6), MoodBand::VeryNegative);
        assert_eq!(MoodBand::from_score(-0.59), MoodBand::Negative);
        assert_eq!(MoodBand::from_score(-0.3), MoodBand::Negative);
        assert_eq!(MoodBand::from_score(-0.29), MoodBand::Neutral);
        assert_eq!(MoodBand::from_score(0.0), MoodBand::Neutral);
        assert_eq!(MoodBand::from_score(0.29), MoodBand::Neutral);
        assert_eq!(MoodBand::from_score(0.3), MoodBand::Positive);
        assert_eq!(MoodBand::from_score(0.59), MoodBand::Positive);
        assert_eq!(MoodBand::from_score(0.6), MoodBand::VeryPositive);
        assert_eq!(MoodBand::from_score(1.0), MoodBand::VeryPositive);
    }

    #[test]
    fn test_band_ordering() {
        assert!(MoodBand::VeryNegative < MoodBand::Negative);
        assert!(MoodBand::Neutral < MoodBand::VeryPositive);
    }

    #[test]
    fn test_coarse_mood_thresholds() {
        assert_eq!(Mood::from_score(-0.31), Mood::Negative);
        assert_eq!(Mood::from_score(-0.3), Mood::Neutral);
        assert_eq!(Mood::from_score(0.3), Mood::Neutral);
        assert_eq!(Mood::from_score(0.31), Mood::Positive);
    }

    #[test]
    fn test_band_collapses_to_mood() {
        assert_eq!(MoodBand::VeryNegative.mood(), Mood::Negative);
        assert_eq!(MoodBand::Neutral.mood(), Mood::Neutral);
        assert_eq!(MoodBand::VeryPositive.mood(), Mood::Positive);
    }

    #[test]
    fn test_display() {
        assert_eq!(MoodBand::VeryNegative.to_string(), "very negative");
        assert_eq!(Mood::Positive.to_string(), "POSITIVE");
    }
}
