//! Generator traits and the REST client for the generative services.
//!
//! [`GenAiClient`] speaks the Gemini-style REST surface: text comes from
//! `models/{id}:generateContent`, images from `models/{id}:predict`
//! (one image per request, base64-encoded bytes in the response).  All
//! connection details come from [`GenAiConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use base64::Engine;

use crate::config::GenAiConfig;
use crate::genai::error::GenAiError;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Async trait for the text generation service.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One blocking round trip: prompt in, explanation text out.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError>;
}

/// Async trait for the image generation service.
///
/// A successful call may legitimately return zero images; callers decide
/// what to do with an empty list.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_images(&self, prompt: &str) -> Result<Vec<GeneratedImage>, GenAiError>;
}

/// One image returned by the image service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

// ---------------------------------------------------------------------------
// GenAiClient
// ---------------------------------------------------------------------------

/// REST client implementing both generator traits.
pub struct GenAiClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl GenAiClient {
    /// Build a client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout
    /// from `config.timeout_secs`.  A default client is used as a
    /// last-resort fallback if the builder fails (should never happen
    /// in practice).
    pub fn from_config(config: &GenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// POST `body` to `{base_url}/v1beta/models/{model}:{verb}` and
    /// return the parsed JSON response.
    ///
    /// The API key header is attached only when a non-empty key is
    /// configured.
    async fn post(
        &self,
        model: &str,
        verb: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GenAiError> {
        let url = format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url, model, verb
        );

        let mut req = self.client.post(&url).json(body);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.header("x-goog-api-key", key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::from_response(status, &body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenAiError::Parse(e.to_string()))?;
        Ok(json)
    }
}

#[async_trait]
impl TextGenerator for GenAiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let json = self
            .post(&self.config.text_model, "generateContent", &body)
            .await?;

        // Concatenate the text parts of the first candidate.
        let parts = json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or(GenAiError::EmptyResponse)?;

        let mut text = String::new();
        for part in parts {
            if let Some(fragment) = part["text"].as_str() {
                text.push_str(fragment);
            }
        }
        Ok(text)
    }
}

#[async_trait]
impl ImageGenerator for GenAiClient {
    async fn generate_images(&self, prompt: &str) -> Result<Vec<GeneratedImage>, GenAiError> {
        let body = serde_json::json!({
            "instances": [
                { "prompt": prompt }
            ],
            "parameters": {
                "sampleCount": 1,
                "outputMimeType": self.config.image_mime
            }
        });

        let json = self
            .post(&self.config.image_model, "predict", &body)
            .await?;

        // A successful response with no predictions is a valid
        // zero-image result, not an error.
        let predictions = match json["predictions"].as_array() {
            Some(p) => p,
            None => return Ok(Vec::new()),
        };

        let mut images = Vec::with_capacity(predictions.len());
        for prediction in predictions {
            let Some(encoded) = prediction["bytesBase64Encoded"].as_str() else {
                continue;
            };
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| GenAiError::Parse(format!("bad image payload: {e}")))?;
            let mime = prediction["mimeType"]
                .as_str()
                .unwrap_or(&self.config.image_mime)
                .to_string();
            images.push(GeneratedImage { bytes, mime });
        }
        Ok(images)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> GenAiConfig {
        GenAiConfig {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            text_model: "gemini-2.5-flash".into(),
            image_model: "imagen-3.0-generate-002".into(),
            image_mime: "image/jpeg".into(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = GenAiClient::from_config(&make_config(None));
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _client = GenAiClient::from_config(&make_config(Some("")));
    }

    /// Verify both traits are object-safe (usable as `Arc<dyn …>`).
    #[test]
    fn generators_are_object_safe() {
        let client = GenAiClient::from_config(&make_config(Some("test-key")));
        let client = std::sync::Arc::new(client);
        let _text: std::sync::Arc<dyn TextGenerator> = client.clone();
        let _image: std::sync::Arc<dyn ImageGenerator> = client;
    }
}
