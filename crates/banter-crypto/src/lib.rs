/// Banter credential helpers.
///
/// Passwords are stored as Argon2id PHC strings. Session tokens are random
/// opaque strings handed to the client; the server only keeps their SHA-256.

pub mod password;
pub mod token;
