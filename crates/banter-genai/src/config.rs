use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_VISION_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_HUGGINGFACE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/prompthero/openjourney-v4";
pub const DEFAULT_IMAGEKIT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

/// Credentials and endpoints for every upstream service.
/// A missing key only fails the calls that need it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Used when the user has no model preference.
    pub default_model: String,
    pub vision_model: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_model_url: String,
    /// The only request deadline in the gateway.
    pub image_timeout: Duration,
    pub imagekit_private_key: Option<String>,
    pub imagekit_upload_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            default_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            huggingface_api_key: None,
            huggingface_model_url: DEFAULT_HUGGINGFACE_MODEL_URL.to_string(),
            image_timeout: Duration::from_secs(120),
            imagekit_private_key: None,
            imagekit_upload_url: DEFAULT_IMAGEKIT_UPLOAD_URL.to_string(),
        }
    }
}
