use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::error::{GenerationError, read_json};
use crate::models::UploadResponse;

const SERVICE: &str = "ImageKit";

/// Uploads generated images so the chat log can store a URL.
#[derive(Clone)]
pub struct ImageKitClient {
    client: Client,
    private_key: Option<String>,
    upload_url: String,
}

impl ImageKitClient {
    pub fn new(client: Client, private_key: Option<String>, upload_url: String) -> Self {
        Self {
            client,
            private_key,
            upload_url,
        }
    }

    /// Upload `bytes` as `file_name` and return the public URL.
    pub async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, GenerationError> {
        let private_key = self
            .private_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::NotConfigured("IMAGEKIT_PRIVATE_KEY"))?;

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("fileName", file_name.to_string());

        tracing::debug!(file_name, "Uploading image to ImageKit");

        // ImageKit authenticates with the private key as the basic-auth user.
        let resp = self
            .client
            .post(&self.upload_url)
            .basic_auth(private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .map_err(GenerationError::transport(SERVICE))?;

        let uploaded: UploadResponse = read_json(SERVICE, resp).await?;

        if uploaded.url.is_empty() {
            return Err(GenerationError::Malformed {
                service: SERVICE,
                detail: "upload returned no url".to_string(),
            });
        }

        Ok(uploaded.url)
    }
}
