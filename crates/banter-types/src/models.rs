use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user. The password hash never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub model: Option<String>,
}

/// One stored (message, reply) pair, as returned by `GET /chats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: i64,
    pub message: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
}
