pub mod auth;
pub mod chats;
pub mod error;
pub mod extract;
pub mod images;
pub mod middleware;
pub mod router;
pub mod settings;
