use axum::{
    Extension, Json,
    extract::State,
};
use chrono::NaiveDate;

use banter_db::models::{ProfileUpdate, UserRow};
use banter_types::api::{ModelsResponse, UpdateSettingsRequest, UpdateSettingsResponse};
use banter_types::models::UserProfile;

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;

/// Validate a `YYYY-MM-DD` birthday and return it in canonical form.
pub(crate) fn parse_birthday(raw: &str) -> Result<String, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| ApiError::InvalidField("birthday"))
}

fn to_profile(row: UserRow) -> UserProfile {
    UserProfile {
        id: row.id,
        username: row.username,
        email: row.email,
        birthday: row
            .birthday
            .and_then(|b| NaiveDate::parse_from_str(&b, "%Y-%m-%d").ok()),
        model: row.model,
    }
}

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = current.user_id;
    let row = run_blocking(&state, move |db| db.get_user_by_id(user_id))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(to_profile(row)))
}

/// POST /update_settings: Absent fields keep their value, a blank email or
/// birthday clears it. The model name is stored as given.
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>, ApiError> {
    let email: Option<Option<String>> = req.email.map(|e| {
        let e = e.trim();
        (!e.is_empty()).then(|| e.to_string())
    });
    let birthday: Option<Option<String>> = match req.birthday {
        Some(b) if b.trim().is_empty() => Some(None),
        Some(b) => Some(Some(parse_birthday(&b)?)),
        None => None,
    };
    let model = match req.model {
        Some(m) if m.trim().is_empty() => return Err(ApiError::InvalidField("model")),
        other => other.map(|m| m.trim().to_string()),
    };

    let user_id = current.user_id;
    let row = run_blocking(&state, move |db| {
        let update = ProfileUpdate {
            email: email.as_ref().map(|e| e.as_deref()),
            birthday: birthday.as_ref().map(|b| b.as_deref()),
            model: model.as_deref(),
        };
        if !db.update_profile(user_id, &update)? {
            return Ok(None);
        }
        db.get_user_by_id(user_id)
    })
    .await?
    .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UpdateSettingsResponse {
        success: true,
        user: to_profile(row),
    }))
}

/// GET /models_list
pub async fn models_list(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.generator.list_models().await?;
    Ok(Json(ModelsResponse { models }))
}
