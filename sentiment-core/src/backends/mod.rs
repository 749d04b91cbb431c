//! Concrete classifier capabilities
//!
//! - [`http::HttpClassifier`]: remote text-classification endpoint (Hugging
//!   Face inference API or any server speaking the same JSON shape)
//! - [`lexicon::LexiconClassifier`]: deterministic offline keyword matcher

pub mod http;
pub mod lexicon;

use std::time::Duration;

use crate::config::{BackendConfig, EnsembleConfig};
use crate::device::DevicePreference;
use crate::error::ConstructionError;
use crate::slot::{CapabilityFactory, Classify};

pub use http::{HttpClassifier, HttpClassifierConfig};
pub use lexicon::LexiconClassifier;

/// Builds a capability from a [`BackendConfig`].
#[derive(Debug, Clone)]
pub struct BackendFactory {
    backend: BackendConfig,
    endpoint_base: String,
    api_token: Option<String>,
    max_length: usize,
    timeout: Duration,
}

impl BackendFactory {
    pub fn new(backend: BackendConfig, config: &EnsembleConfig) -> Self {
        Self {
            backend,
            endpoint_base: config.endpoint_base.clone(),
            api_token: config.api_token.clone(),
            max_length: config.max_length,
            timeout: config.timeout(),
        }
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }
}

impl CapabilityFactory for BackendFactory {
    fn name(&self) -> String {
        self.backend.describe()
    }

    fn build(&self, device: DevicePreference) -> Result<Box<dyn Classify>, ConstructionError> {
        match &self.backend {
            BackendConfig::Http { .. } => {
                let url = self.backend.endpoint(&self.endpoint_base).unwrap_or_default();
                let classifier = HttpClassifier::connect(
                    HttpClassifierConfig {
                        url,
                        api_token: self.api_token.clone(),
                        max_length: self.max_length,
                        timeout: self.timeout,
                    },
                    device,
                )?;
                Ok(Box::new(classifier))
            }
            BackendConfig::Lexicon => Ok(Box::new(LexiconClassifier::new()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_name_follows_backend() {
        let config = EnsembleConfig::default();
        let factory = BackendFactory::new(BackendConfig::http("org/model"), &config);
        assert_eq!(factory.name(), "org/model");

        let factory = BackendFactory::new(BackendConfig::Lexicon, &config);
        assert_eq!(factory.name(), "lexicon");
    }

    #[test]
    fn test_lexicon_factory_builds() {
        let factory = BackendFactory::new(BackendConfig::Lexicon, &EnsembleConfig::offline());
        let classifier = factory.build(DevicePreference::Cpu).unwrap();
        let result = classifier.classify("I feel hopeless").unwrap();
        assert_eq!(result.label, "NEGATIVE");
    }

    #[test]
    fn test_http_factory_rejects_bad_endpoint() {
        let config = EnsembleConfig {
            endpoint_base: "not a url".to_string(),
            ..EnsembleConfig::default()
        };
        let factory = BackendFactory::new(BackendConfig::http("org/model"), &config);
        assert!(matches!(
            factory.build(DevicePreference::Auto),
            Err(ConstructionError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_http_factory_builds_without_network() {
        let config = EnsembleConfig {
            endpoint_base: "http://127.0.0.1:9".to_string(),
            ..EnsembleConfig::default()
        };
        let factory = BackendFactory::new(BackendConfig::http("org/model"), &config);
        assert!(factory.build(DevicePreference::Auto).is_ok());
    }
}
