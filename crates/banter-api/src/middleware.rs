use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use banter_crypto::token::hash_session_token;

use crate::auth::{AppState, SESSION_COOKIE, run_blocking};
use crate::error::ApiError;

/// The authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub token_hash: String,
}

/// Resolve the session cookie to a user. A missing, unknown or expired
/// session is rejected before the handler (and its body extractor) runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let token_hash = hash_session_token(token);
    let lookup = token_hash.clone();
    let user_id = run_blocking(&state, move |db| db.get_session_user(&lookup))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser { user_id, token_hash });
    Ok(next.run(req).await)
}
