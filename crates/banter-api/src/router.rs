use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::middleware::require_session;
use crate::{chats, images, settings};

/// Every route of the service. Protected routes sit behind `require_session`.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route("/chat_api", post(chats::chat_api))
        .route("/chats", get(chats::list_chats))
        .route("/delete_chat/{chat_id}", delete(chats::delete_chat))
        .route(
            "/upload_image",
            post(images::upload_image).layer(DefaultBodyLimit::max(images::UPLOAD_BODY_LIMIT)),
        )
        .route("/generate_image", post(images::generate_image))
        .route("/profile", get(settings::profile))
        .route("/update_settings", post(settings::update_settings))
        .route("/models_list", get(settings::models_list))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
}

/// GET /health: Liveness check (no auth).
async fn health() -> &'static str {
    "ok"
}
