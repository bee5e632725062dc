use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::error::{GenerationError, ensure_success};

const SERVICE: &str = "Hugging Face";

/// Text-to-image through the Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_key: Option<String>,
    model_url: String,
}

impl HuggingFaceClient {
    /// The client gets its own fixed timeout; image generation is slow.
    pub fn new(
        api_key: Option<String>,
        model_url: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GenerationError::transport(SERVICE))?;

        Ok(Self {
            client,
            api_key,
            model_url,
        })
    }

    /// Returns the raw image bytes.
    pub async fn text_to_image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::NotConfigured("HUGGINGFACE_API_KEY"))?;

        tracing::debug!(
            model_url = %self.model_url,
            prompt_length = prompt.len(),
            "Calling Hugging Face inference"
        );

        let resp = self
            .client
            .post(&self.model_url)
            .bearer_auth(api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(GenerationError::transport(SERVICE))?;

        let bytes = ensure_success(SERVICE, resp)
            .await?
            .bytes()
            .await
            .map_err(GenerationError::transport(SERVICE))?;

        if bytes.is_empty() {
            return Err(GenerationError::Malformed {
                service: SERVICE,
                detail: "empty image body".to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}
