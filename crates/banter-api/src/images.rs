use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use tracing::{debug, warn};

use banter_genai::{GenerationRequest, ImageInput};
use banter_types::api::{ChatReply, GenerateImageRequest, ImageResponse};

use crate::auth::{AppState, optional, run_blocking};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;

/// 20 MB, the inline-data ceiling of the vision model.
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Request body limit for `/upload_image`, leaving room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_SIZE + 64 * 1024;

pub const UPLOADED_IMAGE_MESSAGE: &str = "🖼️ Image uploaded";

/// POST /upload_image: Multipart field `file`; replies with a description.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<ChatReply>, ApiError> {
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        image = Some(ImageInput {
            bytes: bytes.to_vec(),
            mime_type,
        });
        break;
    }

    let image = image
        .filter(|img| !img.bytes.is_empty())
        .ok_or(ApiError::NoFile)?;

    if image.bytes.len() > MAX_IMAGE_SIZE {
        return Err(ApiError::ImageTooLarge);
    }

    debug!(
        user_id = current.user_id,
        size = image.bytes.len(),
        mime_type = %image.mime_type,
        "Describing uploaded image"
    );

    let reply = state
        .generator
        .generate(GenerationRequest::describe_image(image))
        .await?;

    let user_id = current.user_id;
    let stored_reply = reply.clone();
    run_blocking(&state, move |db| {
        db.append_chat(user_id, UPLOADED_IMAGE_MESSAGE, &stored_reply)
    })
    .await?;

    Ok(Json(ChatReply { reply }))
}

/// POST /generate_image: Generate, host, and log an image for `prompt`.
pub async fn generate_image(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<GenerateImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let prompt = optional(req.prompt).ok_or(ApiError::PromptRequired)?;

    let user_id = current.user_id;
    let file_name = format!("generated_{}.png", user_id);
    let image_url = state.generator.generate_image(&prompt, &file_name).await?;

    let message = format!("🖼️ Generated image: {}", prompt);
    let stored_url = image_url.clone();
    run_blocking(&state, move |db| db.append_chat(user_id, &message, &stored_url)).await?;

    Ok(Json(ImageResponse { image: image_url }))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::ImageTooLarge;
    }
    warn!("Malformed multipart upload: {}", e);
    ApiError::InvalidField("file")
}
