use reqwest::Client;

use crate::error::{GenerationError, read_json};
use crate::models::{Content, GenerateContentRequest, GenerateContentResponse, ModelList, Part};

const SERVICE: &str = "Gemini";

/// Gemini REST client (`generateContent`, `models.list`).
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::NotConfigured("GEMINI_API_KEY"))
    }

    /// Send one user turn and return the reply text of the first candidate,
    /// or `None` when it carries no text.
    pub async fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<Option<String>, GenerationError> {
        let api_key = self.api_key()?;
        let model = normalize_model_name(model);
        let url = format!("{}/{}:generateContent", self.base_url, model);

        let req = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        };

        tracing::debug!(model = %model, "Calling Gemini generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&req)
            .send()
            .await
            .map_err(GenerationError::transport(SERVICE))?;

        let resp: GenerateContentResponse = read_json(SERVICE, resp).await?;

        Ok(extract_text(&resp))
    }

    /// Names of every model visible to the API key.
    pub async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let api_key = self.api_key()?;
        let url = format!("{}/models", self.base_url);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .get(&url)
                .header("x-goog-api-key", api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = req.send().await.map_err(GenerationError::transport(SERVICE))?;
            let page: ModelList = read_json(SERVICE, resp).await?;

            names.extend(page.models.into_iter().map(|m| m.name));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(names)
    }
}

/// Gemini resource names look like `models/gemini-2.5-flash`; accept the bare
/// model id too. Anything else is left for the service to reject.
pub fn normalize_model_name(model: &str) -> String {
    let model = model.trim();
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Concatenated, trimmed text parts of the first candidate.
pub fn extract_text(resp: &GenerateContentResponse) -> Option<String> {
    let content = resp.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
