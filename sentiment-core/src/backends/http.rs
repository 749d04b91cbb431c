//! HTTP text-classification client.
//!
//! Speaks the Hugging Face inference API shape:
//!
//! ```text
//! POST {url}
//! {"inputs": "...", "parameters": {"truncation": true, "max_length": 512}}
//!
//! 200 [[{"label": "NEGATIVE", "score": 0.97}, {"label": "POSITIVE", "score": 0.03}]]
//! ```
//!
//! A flat `[{"label": ..., "score": ...}]` list is accepted as well.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::device::DevicePreference;
use crate::error::{ConstructionError, InferenceError};
use crate::slot::Classify;
use crate::types::ClassifierResult;

/// Longest response body kept in [`InferenceError::Status`].
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpClassifierConfig {
    pub url: String,
    pub api_token: Option<String>,
    pub max_length: usize,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct HttpClassifier {
    client: Client,
    url: Url,
    api_token: Option<String>,
    max_length: usize,
    device: DevicePreference,
}

impl HttpClassifier {
    /// Validate the endpoint and build the client. Does not contact the server.
    pub fn connect(
        config: HttpClassifierConfig,
        device: DevicePreference,
    ) -> Result<Self, ConstructionError> {
        let url = Url::parse(&config.url).map_err(|e| ConstructionError::InvalidEndpoint {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConstructionError::UnsupportedScheme {
                url: config.url,
                scheme: url.scheme().to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConstructionError::HttpClient)?;

        info!(url = %url, %device, "HTTP classifier configured");

        Ok(Self {
            client,
            url,
            api_token: config.api_token,
            max_length: config.max_length,
            device,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn device(&self) -> DevicePreference {
        self.device
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
}

#[derive(Serialize)]
struct ClassifyParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LabelScore {
    label: String,
    score: f64,
}

/// Both response shapes seen in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    /// Highest-scoring label across the response.
    pub(crate) fn top(self) -> Option<ClassifierResult> {
        let candidates: Vec<LabelScore> = match self {
            ClassifyResponse::Nested(batches) => batches.into_iter().flatten().collect(),
            ClassifyResponse::Flat(scores) => scores,
        };

        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| ClassifierResult::new(best.label, best.score))
    }
}

impl Classify for HttpClassifier {
    fn classify(&self, text: &str) -> Result<ClassifierResult, InferenceError> {
        let body = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                truncation: true,
                max_length: self.max_length,
            },
        };

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(InferenceError::Transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let mut body = response.text().unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(InferenceError::Status { status, body });
        }

        let parsed: ClassifyResponse = response.json().map_err(InferenceError::Decode)?;
        let result = parsed.top().ok_or(InferenceError::EmptyPrediction)?;

        debug!(url = %self.url, label = %result.label, confidence = result.confidence, "HTTP classification");
        Ok(result)
    }
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> HttpClassifierConfig {
        HttpClassifierConfig {
            url: url.to_string(),
            api_token: None,
            max_length: 512,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_nested_response_picks_best() {
        let parsed: ClassifyResponse = serde_json::from_str(
            r#"[[{"label": "negative", "score": 0.12}, {"label": "neutral", "score": 0.08}, {"label": "positive", "score": 0.80}]]"#,
        )
        .unwrap();

        assert_eq!(parsed.top(), Some(ClassifierResult::new("positive", 0.80)));
    }

    #[test]
    fn test_flat_response() {
        let parsed: ClassifyResponse =
            serde_json::from_str(r#"[{"label": "LABEL_0", "score": 0.93}]"#).unwrap();

        assert_eq!(parsed.top(), Some(ClassifierResult::new("LABEL_0", 0.93)));
    }

    #[test]
    fn test_empty_response_has_no_prediction() {
        let parsed: ClassifyResponse = serde_json::from_str("[]").unwrap();
        assert!(parsed.top().is_none());

        let parsed: ClassifyResponse = serde_json::from_str("[[]]").unwrap();
        assert!(parsed.top().is_none());
    }

    #[test]
    fn test_error_payload_does_not_decode() {
        let parsed = serde_json::from_str::<ClassifyResponse>(
            r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let body = ClassifyRequest {
            inputs: "I feel low",
            parameters: ClassifyParameters {
                truncation: true,
                max_length: 128,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["inputs"], "I feel low");
        assert_eq!(json["parameters"]["truncation"], true);
        assert_eq!(json["parameters"]["max_length"], 128);
    }

    #[test]
    fn test_connect_validates_url() {
        assert!(matches!(
            HttpClassifier::connect(config("::nonsense::"), DevicePreference::Auto),
            Err(ConstructionError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            HttpClassifier::connect(config("ftp://models.example/sst2"), DevicePreference::Auto),
            Err(ConstructionError::UnsupportedScheme { .. })
        ));

        let classifier =
            HttpClassifier::connect(config("http://127.0.0.1:9/sst2"), DevicePreference::Cpu)
                .unwrap();
        assert_eq!(classifier.url().path(), "/sst2");
        assert_eq!(classifier.device(), DevicePreference::Cpu);
    }

    #[test]
    fn test_unreachable_endpoint_is_inference_error() {
        // Port 9 (discard) is closed on test hosts; the request fails at transport level.
        let classifier =
            HttpClassifier::connect(config("http://127.0.0.1:9/sst2"), DevicePreference::Auto)
                .unwrap();
        assert!(classifier.classify("I feel fine today").is_err());
    }

    #[test]
    fn test_truncate_at_char_boundary() {
        let mut s = "ééééé".to_string();
        truncate_at_char_boundary(&mut s, 3);
        assert_eq!(s, "é");

        let mut short = "ok".to_string();
        truncate_at_char_boundary(&mut short, 10);
        assert_eq!(short, "ok");
    }
}
