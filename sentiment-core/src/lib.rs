//! Clinical Sentiment Ensemble Library
//!
//! Scores short clinical-interview snippets with three independently trained
//! sentiment classifiers and folds their heterogeneous outputs into one
//! comparable signal.
//!
//! # Components
//!
//! - **Normalizer**: maps a classifier's `(label, confidence)` pair onto a
//!   signed score in `[-1, 1]`
//! - **Slot**: wraps one classifier capability with one-shot loading and an
//!   optional fallback capability
//! - **Ensemble**: owns the three slots, loads them, isolates their failures
//!   and returns the ordered score triple
//! - **Facade**: averaging and single-call helpers
//! - **Backends**: an HTTP text-classification client and an offline lexicon
//!   classifier
//!
//! # Usage
//!
//! ```rust,no_run
//! use sentiment_core::{EnsembleConfig, SentimentEnsemble};
//!
//! let config = EnsembleConfig::from_env();
//! let mut ensemble = SentimentEnsemble::from_config(&config);
//! ensemble.load();
//!
//! let scores = ensemble.analyze("I've been feeling much better and more hopeful");
//! let (mental_health, social, treebank) = scores.into();
//! println!("{mental_health:.3} {social:.3} {treebank:.3}");
//! ```
//!
//! Nothing in this crate returns an error from `analyze`, `average` or
//! `analyze_once`: slot construction and inference failures are logged and
//! degrade to a neutral `0.0` for the affected slot.

#![allow(clippy::uninlined_format_args)]

pub mod backends;
pub mod config;
pub mod device;
pub mod ensemble;
pub mod error;
pub mod facade;
pub mod mood;
pub mod normalizer;
pub mod slot;
pub mod types;

// Re-export the caller-facing surface
pub use config::{BackendConfig, ConfigError, EnsembleConfig, EnvOverrides, SlotsConfig};
pub use device::DevicePreference;
pub use ensemble::{EnsembleReport, SentimentEnsemble, SlotScore, MIN_TEXT_CHARS};
pub use error::{ConstructionError, InferenceError};
pub use facade::{analyze_once, analyze_once_with};
pub use mood::{Mood, MoodBand};
pub use normalizer::{normalize, polarity_of, Polarity};
pub use slot::{CapabilityFactory, Classify, ClassifierSlot, LoadOutcome, SlotState, SlotStatus};
pub use types::{ClassifierResult, EnsembleResult, SignedScore, SlotId};
