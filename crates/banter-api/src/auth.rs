use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::{error, info, warn};

use banter_crypto::password::{hash_password, verify_password};
use banter_crypto::token::{generate_session_token, hash_session_token};
use banter_db::{Database, to_sqlite_timestamp};
use banter_genai::Generator;
use banter_types::api::{LoginRequest, SignupRequest, SuccessResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::settings::parse_birthday;

pub const SESSION_COOKIE: &str = "banter_session";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub generator: Arc<dyn Generator>,
    pub sessions: SessionSettings,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub ttl: chrono::Duration,
    /// Adds the `Secure` attribute to the session cookie.
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::days(30),
            secure_cookie: false,
        }
    }
}

/// Run blocking DB (and hashing) work off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
        .map_err(ApiError::Internal)
}

/// Trimmed value of a field that must be present and not blank.
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    optional(value).ok_or(ApiError::MissingField(field))
}

/// Trimmed value of an optional field; blank counts as absent.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /signup: Create the user and log them in.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;
    let email = optional(req.email);
    let birthday = optional(req.birthday)
        .map(|b| parse_birthday(&b))
        .transpose()?;

    let name = username.clone();
    let user_id = run_blocking(&state, move |db| {
        let password_hash = hash_password(&password)?;
        db.create_user(&name, &password_hash, email.as_deref(), birthday.as_deref())
    })
    .await?
    .ok_or_else(|| {
        info!("Signup rejected, username '{}' is taken", username);
        ApiError::DuplicateUsername
    })?;

    info!(user_id, "User '{}' signed up", username);

    let jar = start_session(&state, jar, user_id).await?;
    Ok((jar, Json(SuccessResponse::ok())))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;

    let name = username.clone();
    let (user_id, valid) = run_blocking(&state, move |db| {
        let Some(user) = db.get_user_by_username(&name)? else {
            return Ok(None);
        };
        let valid = verify_password(&password, &user.password)?;
        Ok(Some((user.id, valid)))
    })
    .await?
    .ok_or(ApiError::UserNotFound)?;

    if !valid {
        warn!(user_id, "Invalid password for '{}'", username);
        return Err(ApiError::InvalidPassword);
    }

    info!(user_id, "User '{}' logged in", username);

    let jar = start_session(&state, jar, user_id).await?;
    Ok((jar, Json(SuccessResponse::ok())))
}

/// GET /logout: Drop the server-side session and the cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let token_hash = current.token_hash.clone();
    run_blocking(&state, move |db| db.delete_session(&token_hash)).await?;

    info!(user_id = current.user_id, "User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/login")))
}

async fn start_session(state: &AppState, jar: CookieJar, user_id: i64) -> Result<CookieJar, ApiError> {
    let token = generate_session_token();
    let token_hash = hash_session_token(&token);
    let expires_at = to_sqlite_timestamp(Utc::now() + state.sessions.ttl);

    run_blocking(state, move |db| db.create_session(&token_hash, user_id, &expires_at)).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.sessions.secure_cookie)
        .build();

    Ok(jar.add(cookie))
}
