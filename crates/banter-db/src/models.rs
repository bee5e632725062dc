//! Database row types, mapped directly to SQLite rows.
//! Distinct from banter-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never plaintext.
    pub password: String,
    pub email: Option<String>,
    pub birthday: Option<String>,
    pub model: Option<String>,
    pub created_at: String,
}

pub struct ChatRow {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub reply: String,
    pub created_at: String,
}

/// Partial profile change applied by `update_profile`. The outer `None`
/// keeps the stored value; `Some(None)` clears it.
#[derive(Default)]
pub struct ProfileUpdate<'a> {
    pub email: Option<Option<&'a str>>,
    pub birthday: Option<Option<&'a str>>,
    /// The model column cannot be cleared.
    pub model: Option<&'a str>,
}
