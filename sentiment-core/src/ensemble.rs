//! Ensemble orchestrator - runs the three slots and normalizes their output
//!
//! # Lifecycle
//!
//! ```text
//! SentimentEnsemble::new / from_config   (slots Unconfigured, not loaded)
//!         │
//!         ▼
//!     load()        each slot loads once, in order; loaded flag set
//!         │
//!         ▼
//!   analyze(text)   slot 1 → slot 2 → slot 3, each normalized on its own
//! ```
//!
//! `analyze` calls `load` itself if needed, so the explicit call is only
//! required when loading should happen ahead of the first text.
//!
//! An ensemble owns its slots and their (potentially large) capabilities.
//! Reuse one instance for many texts rather than building one per text.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backends::BackendFactory;
use crate::config::EnsembleConfig;
use crate::device::DevicePreference;
use crate::mood::{Mood, MoodBand};
use crate::normalizer::normalize;
use crate::slot::{ClassifierSlot, SlotState, SlotStatus};
use crate::types::{ClassifierResult, EnsembleResult, SignedScore, SlotId};

/// Shortest trimmed text, in characters, that reaches the classifiers.
pub const MIN_TEXT_CHARS: usize = 3;

/// Three classifier slots scored together.
#[derive(Debug)]
pub struct SentimentEnsemble {
    slots: [ClassifierSlot; 3],
    device: DevicePreference,
    models_loaded: bool,
}

impl SentimentEnsemble {
    /// Assemble an ensemble from pre-built slots.
    ///
    /// Slot ids are taken from the slots themselves; position in the
    /// argument list defines score order.
    pub fn new(
        mental_health: ClassifierSlot,
        social: ClassifierSlot,
        treebank: ClassifierSlot,
        device: DevicePreference,
    ) -> Self {
        Self {
            slots: [mental_health, social, treebank],
            device,
            models_loaded: false,
        }
    }

    /// Build slots backed by the configured backends. Nothing is loaded yet.
    pub fn from_config(config: &EnsembleConfig) -> Self {
        let [mental_health, social, treebank] = SlotId::all().map(|id| {
            let primary = BackendFactory::new(config.slots.get(id).clone(), config);
            let slot = ClassifierSlot::new(id, Box::new(primary));
            match config.slots.fallback(id) {
                Some(fallback) => {
                    slot.with_fallback(Box::new(BackendFactory::new(fallback.clone(), config)))
                }
                None => slot,
            }
        });
        Self::new(mental_health, social, treebank, config.device)
    }

    /// Load every slot, in order. Runs once; later calls do nothing.
    ///
    /// The ensemble counts as loaded afterwards even if every slot ended
    /// [`SlotState::Unavailable`]. Failed slots are not retried.
    pub fn load(&mut self) {
        if self.models_loaded {
            return;
        }

        info!(device = %self.device, "Loading sentiment classifiers");
        for slot in self.slots.iter_mut() {
            slot.load(self.device);
        }
        self.models_loaded = true;

        let serving = self
            .slots
            .iter()
            .filter(|s| s.state().is_serving())
            .count();
        if serving == self.slots.len() {
            info!(serving, "Sentiment classifiers loaded");
        } else {
            warn!(
                serving,
                total = self.slots.len(),
                "Sentiment classifiers loaded with unavailable slots"
            );
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.models_loaded
    }

    pub fn device(&self) -> DevicePreference {
        self.device
    }

    pub fn slot_state(&self, slot: SlotId) -> SlotState {
        self.slots[slot.index()].state()
    }

    pub fn status(&self) -> Vec<SlotStatus> {
        self.slots.iter().map(ClassifierSlot::status).collect()
    }

    /// Score `text` with every slot.
    ///
    /// Empty text, or text shorter than [`MIN_TEXT_CHARS`] once trimmed,
    /// returns `(0.0, 0.0, 0.0)` without loading or calling any slot.
    pub fn analyze(&mut self, text: &str) -> EnsembleResult {
        match self.classify_all(text) {
            Some(results) => results.map(|r| normalize(&r)).into(),
            None => EnsembleResult::neutral(),
        }
    }

    /// [`analyze`](Self::analyze) with per-slot labels, average and mood.
    pub fn analyze_report(&mut self, text: &str) -> EnsembleReport {
        let results = self
            .classify_all(text)
            .unwrap_or_else(|| SlotId::all().map(|_| ClassifierResult::neutral()));

        let slots = SlotId::all().map(|id| {
            let result = &results[id.index()];
            SlotScore {
                slot: id,
                label: result.label.clone(),
                confidence: result.confidence,
                score: normalize(result),
            }
        });
        EnsembleReport::new(text, slots)
    }

    /// Raw slot results, or `None` for text too short to score.
    fn classify_all(&mut self, text: &str) -> Option<[ClassifierResult; 3]> {
        if !is_scorable(text) {
            debug!(chars = text.chars().count(), "Text too short to score");
            return None;
        }

        self.load();

        let [a, b, c] = &self.slots;
        Some([a.infer(text), b.infer(text), c.infer(text)])
    }
}

fn is_scorable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_TEXT_CHARS
}

/// One slot's contribution to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotScore {
    pub slot: SlotId,
    pub label: String,
    pub confidence: f64,
    pub score: SignedScore,
}

/// Full result for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleReport {
    pub text: String,
    pub slots: [SlotScore; 3],
    pub average: f64,
    pub band: MoodBand,
    pub mood: Mood,
}

impl EnsembleReport {
    fn new(text: &str, slots: [SlotScore; 3]) -> Self {
        let average = slots.iter().map(|s| s.score).sum::<f64>() / slots.len() as f64;
        Self {
            text: text.to_string(),
            slots,
            average,
            band: MoodBand::from_score(average),
            mood: Mood::from_score(average),
        }
    }

    /// The bare score triple.
    pub fn scores(&self) -> EnsembleResult {
        self.slots.each_ref().map(|s| s.score).into()
    }
}
