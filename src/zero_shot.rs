//! Zero-shot text classification client.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::ZeroShotConfig;

/// Why a single classification attempt produced no prediction.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("request to classifier failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode classifier response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("classifier returned no labels")]
    EmptyPrediction,
    #[error("classifier returned unknown label '{0}'")]
    UnknownLabel(String),
}

/// Candidate labels with their scores, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroShotPrediction {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotPrediction {
    pub fn new(pairs: Vec<(String, f64)>) -> Result<Self, ClassifyError> {
        if pairs.is_empty() {
            return Err(ClassifyError::EmptyPrediction);
        }
        let mut pairs = pairs;
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = pairs.into_iter().unzip();
        Ok(Self { labels, scores })
    }

    pub fn top(&self) -> Option<(&str, f64)> {
        self.labels.first().map(|l| l.as_str()).zip(self.scores.first().copied())
    }
}

/// A pretrained classifier scoring a sequence against natural-language hypotheses.
#[allow(async_fn_in_trait)]
pub trait ZeroShotClassifier {
    async fn classify(
        &self,
        sequence: &str,
        candidate_labels: &[&str],
        hypothesis_template: &str,
    ) -> Result<ZeroShotPrediction, ClassifyError>;
}

// The inference API answers either in the pipeline shape or as a label/score list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Pipeline { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

pub fn parse_inference_response(body: &str) -> Result<ZeroShotPrediction, ClassifyError> {
    let pairs: Vec<(String, f64)> = match serde_json::from_str::<InferenceResponse>(body)? {
        InferenceResponse::Pipeline { labels, scores } => labels.into_iter().zip(scores).collect(),
        InferenceResponse::Pairs(list) => list.into_iter().map(|p| (p.label, p.score)).collect(),
    };
    ZeroShotPrediction::new(pairs)
}

/// Hugging Face inference endpoint client for an NLI zero-shot model.
pub struct HfInferenceClassifier {
    client: Client,
    url: String,
    api_token: Option<String>,
}

impl HfInferenceClassifier {
    pub fn new(config: &ZeroShotConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/{}", config.endpoint.trim_end_matches('/'), config.model),
            api_token: config.api_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ZeroShotClassifier for HfInferenceClassifier {
    async fn classify(
        &self,
        sequence: &str,
        candidate_labels: &[&str],
        hypothesis_template: &str,
    ) -> Result<ZeroShotPrediction, ClassifyError> {
        let body = json!({
            "inputs": sequence,
            "parameters": {
                "candidate_labels": candidate_labels,
                "hypothesis_template": hypothesis_template,
                "multi_label": false
            }
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClassifyError::Status { status: status.as_u16(), body: text });
        }
        debug!("Classifier response: {}", text);
        parse_inference_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_pipeline_shaped_response() {
        let body = r#"{"sequence":"battery great","labels":["neutral","positive","negative"],"scores":[0.2,0.7,0.1]}"#;
        let prediction = parse_inference_response(body).unwrap();
        assert_eq!(prediction.top(), Some(("positive", 0.7)));
        assert_eq!(prediction.labels, vec!["positive", "neutral", "negative"]);
    }

    #[test]
    fn parses_label_score_list_response() {
        let body = r#"[{"label":"negative","score":0.91},{"label":"neutral","score":0.09}]"#;
        let prediction = parse_inference_response(body).unwrap();
        assert_eq!(prediction.top(), Some(("negative", 0.91)));
    }

    #[test]
    fn empty_or_malformed_responses_are_errors() {
        assert!(matches!(parse_inference_response("[]"), Err(ClassifyError::EmptyPrediction)));
        assert!(matches!(parse_inference_response(r#"{"error":"loading"}"#), Err(ClassifyError::Decode(_))));
    }

    #[test]
    fn builds_model_url_from_config() {
        let config = ZeroShotConfig {
            model: "facebook/bart-large-mnli".to_string(),
            endpoint: "https://example.test/models/".to_string(),
            api_token: None,
            timeout: Duration::from_secs(1),
        };
        let classifier = HfInferenceClassifier::new(&config).unwrap();
        assert_eq!(classifier.url(), "https://example.test/models/facebook/bart-large-mnli");
    }
}
