//! Aggregation helpers on top of [`SentimentEnsemble`].

use crate::config::EnsembleConfig;
use crate::ensemble::SentimentEnsemble;
use crate::types::EnsembleResult;

impl SentimentEnsemble {
    /// Mean of the three scores for `text`.
    pub fn average(&mut self, text: &str) -> f64 {
        self.analyze(text).mean()
    }
}

/// Score one text with a throwaway ensemble built from the environment.
///
/// Every call builds and loads all three classifiers from scratch. For more
/// than one text, keep a [`SentimentEnsemble`] and call
/// [`analyze`](SentimentEnsemble::analyze) on it instead.
pub fn analyze_once(text: &str) -> EnsembleResult {
    analyze_once_with(&EnsembleConfig::from_env(), text)
}

/// [`analyze_once`] with an explicit configuration.
pub fn analyze_once_with(config: &EnsembleConfig, text: &str) -> EnsembleResult {
    let mut ensemble = SentimentEnsemble::from_config(config);
    ensemble.load();
    ensemble.analyze(text)
}
