use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::Client;

use crate::config::GatewayConfig;
use crate::error::GenerationError;
use crate::gemini::GeminiClient;
use crate::huggingface::HuggingFaceClient;
use crate::imagekit::ImageKitClient;
use crate::models::Part;

/// Prompt sent alongside an uploaded image.
pub const DESCRIBE_IMAGE_PROMPT: &str = "Describe this image:";

/// Reply used when the vision model answers with nothing.
pub const EMPTY_IMAGE_REPLY: &str = "No response.";

#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub image: Option<ImageInput>,
    /// Free-form model name, passed through as given.
    pub model: Option<String>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>, model: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            model,
        }
    }

    pub fn describe_image(image: ImageInput) -> Self {
        Self {
            prompt: DESCRIBE_IMAGE_PROMPT.to_string(),
            image: Some(image),
            model: None,
        }
    }
}

/// Everything the HTTP layer needs from the generative services.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Text reply for a prompt, optionally about an attached image.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Generate an image for `prompt`, host it as `file_name`, return its URL.
    async fn generate_image(&self, prompt: &str, file_name: &str) -> Result<String, GenerationError>;

    async fn list_models(&self) -> Result<Vec<String>, GenerationError>;
}

/// The production `Generator`, one client per upstream service.
#[derive(Clone)]
pub struct Gateway {
    gemini: GeminiClient,
    huggingface: HuggingFaceClient,
    imagekit: ImageKitClient,
    default_model: String,
    vision_model: String,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(GenerationError::transport("HTTP client"))?;

        Ok(Self {
            gemini: GeminiClient::new(client.clone(), config.gemini_api_key, config.gemini_base_url),
            huggingface: HuggingFaceClient::new(
                config.huggingface_api_key,
                config.huggingface_model_url,
                config.image_timeout,
            )?,
            imagekit: ImageKitClient::new(
                client,
                config.imagekit_private_key,
                config.imagekit_upload_url,
            ),
            default_model: config.default_model,
            vision_model: config.vision_model,
        })
    }
}

#[async_trait]
impl Generator for Gateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        match request.image {
            Some(image) => {
                let model = request.model.as_deref().unwrap_or(self.vision_model.as_str());
                let parts = vec![
                    Part::text(request.prompt),
                    Part::inline(image.mime_type, B64.encode(&image.bytes)),
                ];
                let reply = self.gemini.generate_content(model, parts).await?;
                Ok(reply.unwrap_or_else(|| EMPTY_IMAGE_REPLY.to_string()))
            }
            None => {
                let model = request
                    .model
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(self.default_model.as_str());
                self.gemini
                    .generate_content(model, vec![Part::text(request.prompt)])
                    .await?
                    .ok_or_else(|| GenerationError::Malformed {
                        service: "Gemini",
                        detail: "response contained no text".to_string(),
                    })
            }
        }
    }

    async fn generate_image(&self, prompt: &str, file_name: &str) -> Result<String, GenerationError> {
        let bytes = self.huggingface.text_to_image(prompt).await?;
        tracing::debug!(size = bytes.len(), "Image generated");
        self.imagekit.upload(bytes, file_name).await
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        self.gemini.list_models().await
    }
}
