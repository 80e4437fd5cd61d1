//! HTTP adapter for the classification service.
//!
//! Wire format: `POST {base}/predict` with `{"image": "<base64 jpeg>"}`
//! answered by `{"prediction": "...", "confidence": 0.93}` or
//! `{"error": "..."}`; `POST {base}/reset` with an empty body clears the
//! server-side frame accumulation state.

use crate::classify::{ClassifierVerdict, SignClassifier};
use crate::defaults;
use crate::error::{Result, WeSignError};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: Option<String>,
    confidence: Option<f32>,
    error: Option<String>,
}

fn verdict_from_response(response: PredictResponse) -> ClassifierVerdict {
    if let Some(error) = response.error {
        return ClassifierVerdict::ServiceError(error);
    }
    match response.prediction {
        Some(label) => ClassifierVerdict::Prediction {
            label,
            confidence: response.confidence.unwrap_or(0.0),
        },
        None => ClassifierVerdict::Collecting,
    }
}

/// Classification service client over HTTP.
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    /// Creates a client for the service at `base_url`
    /// (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SignClassifier for HttpClassifier {
    async fn predict(&self, jpeg: &[u8]) -> Result<ClassifierVerdict> {
        let image = BASE64.encode(jpeg);
        let response = self
            .client
            .post(self.endpoint(defaults::PREDICT_ENDPOINT))
            .json(&PredictRequest { image: &image })
            .send()
            .await
            .map_err(|e| WeSignError::Transport {
                message: e.to_string(),
            })?;

        let body: PredictResponse =
            response.json().await.map_err(|e| WeSignError::Transport {
                message: format!("malformed prediction response: {e}"),
            })?;

        Ok(verdict_from_response(body))
    }

    async fn reset(&self) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(defaults::RESET_ENDPOINT))
            .send()
            .await
            .map_err(|e| WeSignError::Transport {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(WeSignError::Service {
                message: format!("reset rejected with status {}", response.status()),
            });
        }
        Ok(())
    }
}
