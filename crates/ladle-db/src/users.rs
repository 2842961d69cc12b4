use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::models::UserRow;

/// Outcome of inserting a user. A taken username is an expected outcome of
/// registration, not a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInsert {
    Created,
    UsernameTaken,
}

impl Database {
    /// Insert-if-absent on `username`. Nothing is written when the name is
    /// already in use.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<UserInsert> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO NOTHING",
                (id, username, password_hash),
            )?;

            Ok(if inserted == 0 {
                UserInsert::UsernameTaken
            } else {
                UserInsert::Created
            })
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, password FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                password: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}
