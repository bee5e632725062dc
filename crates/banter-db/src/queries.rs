use crate::models::{ChatRow, ProfileUpdate, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Returns `None` when the username is already taken.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        birthday: Option<&str>,
    ) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, email, birthday) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![username, password_hash, email, birthday],
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", &username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", &id))
    }

    /// Apply a partial profile change in one statement, so concurrent updates
    /// touching different columns never overwrite each other. Returns false if
    /// the user does not exist.
    pub fn update_profile(&self, id: i64, update: &ProfileUpdate<'_>) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET
                    email = CASE WHEN ?1 THEN ?2 ELSE email END,
                    birthday = CASE WHEN ?3 THEN ?4 ELSE birthday END,
                    model = COALESCE(?5, model)
                 WHERE id = ?6",
                rusqlite::params![
                    update.email.is_some(),
                    update.email.flatten(),
                    update.birthday.is_some(),
                    update.birthday.flatten(),
                    update.model,
                    id
                ],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Sessions --

    /// `expires_at` uses the `datetime('now')` text format.
    pub fn create_session(&self, token_hash: &str, user_id: i64, expires_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![token_hash, user_id, expires_at],
            )?;
            Ok(())
        })
    }

    /// Resolve a session to its user id, ignoring expired sessions.
    pub fn get_session_user(&self, token_hash: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > datetime('now')",
                [token_hash],
                |row| row.get(0),
            )
            .optional()
        })
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE token_hash = ?1", [token_hash])?;
            Ok(removed > 0)
        })
    }

    /// Delete every expired session, returning how many were removed.
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let removed =
                conn.execute("DELETE FROM sessions WHERE expires_at <= datetime('now')", [])?;
            Ok(removed)
        })
    }

    // -- Chats --

    pub fn append_chat(&self, user_id: i64, message: &str, reply: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chats (user_id, message, reply) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, message, reply],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All chats of one user, oldest first.
    pub fn list_chats(&self, user_id: i64) -> Result<Vec<ChatRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, message, reply, created_at
                 FROM chats
                 WHERE user_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ChatRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        message: row.get(2)?,
                        reply: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete one chat owned by `user_id`. Someone else's chat is left alone
    /// and reported as not deleted.
    pub fn delete_chat(&self, user_id: i64, chat_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM chats WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![chat_id, user_id],
            )?;
            Ok(removed > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, key: &dyn rusqlite::ToSql) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, password, email, birthday, model, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([key], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            email: row.get(3)?,
            birthday: row.get(4)?,
            model: row.get(5)?,
            created_at: row.get(6)?,
        })
    })
    .optional()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
