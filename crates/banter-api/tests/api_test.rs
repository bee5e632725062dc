//! Router-level tests: the full axum app over an in-memory database, with a
//! stub standing in for the generative services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use banter_api::auth::{AppState, AppStateInner, SessionSettings};
use banter_api::images::{MAX_IMAGE_SIZE, UPLOAD_BODY_LIMIT};
use banter_api::router::build_router;
use banter_db::Database;
use banter_genai::{GenerationError, GenerationRequest, Generator};

#[derive(Default)]
struct StubGenerator {
    fail: bool,
    calls: AtomicUsize,
    last_model: Mutex<Option<String>>,
}

impl StubGenerator {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn quota_error() -> GenerationError {
        GenerationError::Upstream {
            service: "Gemini",
            status: 429,
            body: "quota exceeded".to_string(),
        }
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_model.lock().unwrap() = request.model.clone();
        if self.fail {
            return Err(Self::quota_error());
        }
        match request.image {
            Some(image) => Ok(format!("{} bytes of {}", image.bytes.len(), image.mime_type)),
            None => Ok(format!("echo: {}", request.prompt)),
        }
    }

    async fn generate_image(&self, _prompt: &str, file_name: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Self::quota_error());
        }
        Ok(format!("https://images.example/{}", file_name))
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        Ok(vec![
            "models/gemini-2.0-flash".to_string(),
            "models/gemini-2.5-flash".to_string(),
        ])
    }
}

struct TestApp {
    app: Router,
    state: AppState,
    generator: Arc<StubGenerator>,
}

fn setup_with(generator: StubGenerator, sessions: SessionSettings) -> TestApp {
    let generator = Arc::new(generator);
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        generator: generator.clone(),
        sessions,
    });
    TestApp {
        app: build_router(state.clone()),
        state,
        generator,
    }
}

fn setup() -> TestApp {
    setup_with(StubGenerator::default(), SessionSettings::default())
}

struct TestResponse {
    status: StatusCode,
    body: Value,
    /// `name=value` part of the Set-Cookie header, if any.
    cookie: Option<String>,
    location: Option<String>,
}

async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        body,
        cookie,
        location,
    }
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    send(app, req.unwrap()).await
}

fn multipart_request(cookie: &str, field: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "banter-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"cat.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload_image")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

/// POST with a raw body, for payloads `call` cannot express.
async fn post_raw(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: &str,
) -> TestResponse {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn signup(app: &Router, username: &str, password: &str) -> String {
    let resp = call(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "signup failed: {}", resp.body);
    assert_eq!(resp.body, json!({"success": true}));
    resp.cookie.expect("signup should set a session cookie")
}

async fn chats(app: &Router, cookie: &str) -> Vec<Value> {
    let resp = call(app, "GET", "/chats", Some(cookie), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    resp.body.as_array().cloned().unwrap()
}

// ─── Credentials & sessions ──────────────────────────────────────────

#[tokio::test]
async fn duplicate_signup_is_rejected_without_second_row() {
    let t = setup();
    signup(&t.app, "alice", "wonderland").await;

    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "alice", "password": "other-password"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Username already exists");
    assert!(resp.cookie.is_none());

    let count: i64 = t
        .state
        .db
        .with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM users WHERE username = 'alice'", [], |r| {
                r.get(0)
            })?)
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn signup_requires_username_and_password() {
    let t = setup();

    let resp = call(&t.app, "POST", "/signup", None, Some(json!({}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Missing field: username");

    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "bob", "password": "   "})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Missing field: password");
}

#[tokio::test]
async fn signup_stores_profile_fields() {
    let t = setup();
    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "username": "carol",
            "password": "secret-pass",
            "email": "carol@example.com",
            "birthday": "1990-04-01"
        })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let cookie = resp.cookie.unwrap();

    let profile = call(&t.app, "GET", "/profile", Some(&cookie), None).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["username"], "carol");
    assert_eq!(profile.body["email"], "carol@example.com");
    assert_eq!(profile.body["birthday"], "1990-04-01");
    assert_eq!(profile.body["model"], "models/gemini-2.0-flash");
}

#[tokio::test]
async fn signup_rejects_malformed_birthday() {
    let t = setup();
    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "dave", "password": "pw", "birthday": "01/04/1990"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Invalid field: birthday");
    assert!(t.state.db.get_user_by_username("dave").unwrap().is_none());
}

#[tokio::test]
async fn passwords_are_not_stored_in_plaintext() {
    let t = setup();
    signup(&t.app, "erin", "correct horse").await;

    let user = t.state.db.get_user_by_username("erin").unwrap().unwrap();
    assert_ne!(user.password, "correct horse");
    assert!(user.password.starts_with("$argon2id$"));
}

#[tokio::test]
async fn login_outcomes_are_distinguishable() {
    let t = setup();
    signup(&t.app, "frank", "letmein").await;

    let ok = call(
        &t.app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "frank", "password": "letmein"})),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body, json!({"success": true}));
    let cookie = ok.cookie.expect("login should set a session cookie");
    assert_eq!(call(&t.app, "GET", "/chats", Some(&cookie), None).await.status, StatusCode::OK);

    let wrong = call(
        &t.app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "frank", "password": "letmeout"})),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "Invalid password");
    assert!(wrong.cookie.is_none());

    let unknown = call(
        &t.app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "nobody", "password": "letmein"})),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["error"], "User not found");
}

#[tokio::test]
async fn protected_endpoints_require_a_session() {
    let t = setup();
    let endpoints: Vec<(&str, &str, Option<Value>)> = vec![
        ("GET", "/logout", None),
        ("POST", "/chat_api", Some(json!({"message": "hello"}))),
        ("POST", "/chat_api", Some(json!({}))),
        ("GET", "/chats", None),
        ("DELETE", "/delete_chat/1", None),
        ("POST", "/upload_image", None),
        ("POST", "/generate_image", Some(json!({"prompt": "a cat"}))),
        ("GET", "/profile", None),
        ("POST", "/update_settings", Some(json!({"model": "x"}))),
        ("GET", "/models_list", None),
    ];

    for cookie in [None, Some("banter_session=not-a-real-token")] {
        for (method, uri, body) in &endpoints {
            let resp = call(&t.app, method, uri, cookie, body.clone()).await;
            assert_eq!(resp.status, StatusCode::FORBIDDEN, "{} {} with {:?}", method, uri, cookie);
            assert_eq!(resp.body["error"], "Unauthorized");
        }
    }

    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let t = setup();
    let cookie = signup(&t.app, "grace", "hopper").await;

    let resp = call(&t.app, "GET", "/logout", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/login"));
    assert!(resp.cookie.unwrap().starts_with("banter_session="));

    let after = call(&t.app, "GET", "/chats", Some(&cookie), None).await;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_session_is_unauthorized() {
    let t = setup_with(
        StubGenerator::default(),
        SessionSettings {
            ttl: chrono::Duration::hours(-1),
            secure_cookie: false,
        },
    );
    let cookie = signup(&t.app, "heidi", "pw").await;

    let resp = call(&t.app, "GET", "/chats", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

// ─── Chat log ────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_history_is_an_empty_list() {
    let t = setup();
    let cookie = signup(&t.app, "ivan", "pw").await;
    assert!(chats(&t.app, &cookie).await.is_empty());
}

#[tokio::test]
async fn chat_reply_is_stored_once_in_order() {
    let t = setup();
    let cookie = signup(&t.app, "judy", "pw").await;

    for message in ["first question", "second question"] {
        let resp = call(
            &t.app,
            "POST",
            "/chat_api",
            Some(&cookie),
            Some(json!({"message": message})),
        )
        .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["reply"], format!("echo: {}", message));
    }

    let history = chats(&t.app, &cookie).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["message"], "first question");
    assert_eq!(history[0]["reply"], "echo: first question");
    assert_eq!(history[1]["message"], "second question");
    assert!(history[0]["id"].as_i64().unwrap() < history[1]["id"].as_i64().unwrap());
    assert!(history[0]["created_at"].is_string());

    // The stored per-user preference is handed to the generator.
    assert_eq!(
        t.generator.last_model.lock().unwrap().as_deref(),
        Some("models/gemini-2.0-flash")
    );
}

#[tokio::test]
async fn blank_message_is_rejected_without_calling_upstream() {
    let t = setup();
    let cookie = signup(&t.app, "kate", "pw").await;

    let resp = call(
        &t.app,
        "POST",
        "/chat_api",
        Some(&cookie),
        Some(json!({"message": "   "})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Empty message");
    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
    assert!(chats(&t.app, &cookie).await.is_empty());
}

#[tokio::test]
async fn failed_generation_stores_nothing() {
    let t = setup_with(StubGenerator::failing(), SessionSettings::default());
    let cookie = signup(&t.app, "leo", "pw").await;

    let resp = call(
        &t.app,
        "POST",
        "/chat_api",
        Some(&cookie),
        Some(json!({"message": "hello"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["error"], "Gemini error: quota exceeded");
    assert!(chats(&t.app, &cookie).await.is_empty());

    let resp = call(
        &t.app,
        "POST",
        "/generate_image",
        Some(&cookie),
        Some(json!({"prompt": "a lighthouse"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(chats(&t.app, &cookie).await.is_empty());
}

#[tokio::test]
async fn deleting_another_users_chat_is_a_no_op() {
    let t = setup();
    let alice = signup(&t.app, "alice", "pw-a").await;
    let bob = signup(&t.app, "bob", "pw-b").await;

    call(&t.app, "POST", "/chat_api", Some(&alice), Some(json!({"message": "mine"}))).await;
    let id = chats(&t.app, &alice).await[0]["id"].as_i64().unwrap();

    let resp = call(&t.app, "DELETE", &format!("/delete_chat/{}", id), Some(&bob), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"success": true}));
    assert_eq!(chats(&t.app, &alice).await.len(), 1);
    assert!(chats(&t.app, &bob).await.is_empty());

    let resp = call(&t.app, "DELETE", &format!("/delete_chat/{}", id), Some(&alice), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(chats(&t.app, &alice).await.is_empty());
}

// ─── Images ──────────────────────────────────────────────────────────

#[tokio::test]
async fn uploaded_image_is_described_and_logged() {
    let t = setup();
    let cookie = signup(&t.app, "mallory", "pw").await;

    let resp = send(&t.app, multipart_request(&cookie, "file", &[0x89, b'P', b'N', b'G'])).await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(resp.body["reply"], "4 bytes of image/png");

    let history = chats(&t.app, &cookie).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["message"], "🖼️ Image uploaded");
    assert_eq!(history[0]["reply"], "4 bytes of image/png");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let t = setup();
    let cookie = signup(&t.app, "niaj", "pw").await;

    let resp = send(&t.app, multipart_request(&cookie, "attachment", b"data")).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "No file uploaded");
    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generated_image_url_is_returned_and_logged() {
    let t = setup();
    let cookie = signup(&t.app, "olivia", "pw").await;
    let user_id = t.state.db.get_user_by_username("olivia").unwrap().unwrap().id;

    let resp = call(
        &t.app,
        "POST",
        "/generate_image",
        Some(&cookie),
        Some(json!({"prompt": "  a red fox  "})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let url = format!("https://images.example/generated_{}.png", user_id);
    assert_eq!(resp.body["image"], url.as_str());

    let history = chats(&t.app, &cookie).await;
    assert_eq!(history[0]["message"], "🖼️ Generated image: a red fox");
    assert_eq!(history[0]["reply"], url.as_str());

    let resp = call(
        &t.app,
        "POST",
        "/generate_image",
        Some(&cookie),
        Some(json!({"prompt": ""})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Prompt required");
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_generation() {
    let t = setup();
    let cookie = signup(&t.app, "nora", "pw").await;

    // Fits the request body limit but not the image limit.
    let resp = send(&t.app, multipart_request(&cookie, "file", &vec![0u8; MAX_IMAGE_SIZE + 1])).await;
    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(resp.body, json!({"error": "Image too large"}));

    // Exceeds the request body limit itself.
    let resp = send(&t.app, multipart_request(&cookie, "file", &vec![0u8; UPLOAD_BODY_LIMIT])).await;
    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(resp.body, json!({"error": "Image too large"}));

    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
    assert!(chats(&t.app, &cookie).await.is_empty());
}

// ─── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn model_preference_flows_into_chat() {
    let t = setup();
    let cookie = signup(&t.app, "peggy", "pw").await;

    let resp = call(
        &t.app,
        "POST",
        "/update_settings",
        Some(&cookie),
        Some(json!({"model": "gemini-2.5-pro", "email": "peggy@example.com"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["user"]["model"], "gemini-2.5-pro");
    assert_eq!(resp.body["user"]["email"], "peggy@example.com");

    call(&t.app, "POST", "/chat_api", Some(&cookie), Some(json!({"message": "hi"}))).await;
    assert_eq!(
        t.generator.last_model.lock().unwrap().as_deref(),
        Some("gemini-2.5-pro")
    );
}

#[tokio::test]
async fn partial_settings_update_keeps_other_fields() {
    let t = setup();
    let cookie = signup(&t.app, "quinn", "pw").await;

    call(
        &t.app,
        "POST",
        "/update_settings",
        Some(&cookie),
        Some(json!({"email": "q@example.com", "birthday": "2000-01-02"})),
    )
    .await;

    let resp = call(
        &t.app,
        "POST",
        "/update_settings",
        Some(&cookie),
        Some(json!({"email": ""})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["email"], Value::Null);
    assert_eq!(resp.body["user"]["birthday"], "2000-01-02");
    assert_eq!(resp.body["user"]["model"], "models/gemini-2.0-flash");

    let resp = call(
        &t.app,
        "POST",
        "/update_settings",
        Some(&cookie),
        Some(json!({"model": "  "})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Invalid field: model");
}

#[tokio::test]
async fn models_are_listed() {
    let t = setup();
    let cookie = signup(&t.app, "rupert", "pw").await;

    let resp = call(&t.app, "GET", "/models_list", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({"models": ["models/gemini-2.0-flash", "models/gemini-2.5-flash"]})
    );
}

#[tokio::test]
async fn health_needs_no_session() {
    let t = setup();
    let resp = call(&t.app, "GET", "/health", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Value::String("ok".to_string()));
}

// ─── Request bodies ──────────────────────────────────────────────────

#[tokio::test]
async fn null_message_counts_as_empty() {
    let t = setup();
    let cookie = signup(&t.app, "oscar", "pw").await;

    let resp = call(
        &t.app,
        "POST",
        "/chat_api",
        Some(&cookie),
        Some(json!({"message": null})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Empty message"}));

    let resp = call(&t.app, "POST", "/chat_api", Some(&cookie), Some(json!({}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Empty message"}));

    let resp = call(
        &t.app,
        "POST",
        "/generate_image",
        Some(&cookie),
        Some(json!({"prompt": null})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Prompt required"}));

    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn null_credentials_are_missing_fields() {
    let t = setup();

    let resp = call(
        &t.app,
        "POST",
        "/login",
        None,
        Some(json!({"username": null, "password": "pw"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Missing field: username"}));

    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "pat", "password": null})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Missing field: password"}));
}

#[tokio::test]
async fn extra_signup_fields_are_ignored() {
    let t = setup();
    let resp = call(
        &t.app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "quincy", "password": "pw", "remember": true})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"success": true}));
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let t = setup();
    let cookie = signup(&t.app, "rita", "pw").await;

    let cases = [
        ("/login", None, None, r#"{"username":"rita","password":"pw"}"#),
        ("/login", None, Some("application/json"), r#"{"username": "rita""#),
        ("/chat_api", Some(cookie.as_str()), Some("application/json"), r#"{"message": 42}"#),
        ("/update_settings", Some(cookie.as_str()), Some("application/json"), r#"{"theme": "dark"}"#),
    ];

    for (uri, cookie, content_type, body) in cases {
        let resp = post_raw(&t.app, uri, cookie, content_type, body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{} {}", uri, body);
        let message = resp.body["error"].as_str().unwrap_or_default();
        assert!(
            message.starts_with("Invalid request body: "),
            "{} {} gave {}",
            uri,
            body,
            resp.body
        );
    }

    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
}
