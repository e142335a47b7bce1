//! Session Repository
//!
//! Persists the login session and small UI preferences.

use rusqlite::{params, OptionalExtension};

use super::db::{lock, SharedConnection};
use super::traits::{SessionStore, StoredSession};
use crate::domain::{AuthTokens, DomainResult};

/// Preference key for the habit list sort order
pub const SORT_OPTION_KEY: &str = "habit-sort-option";

pub struct SessionRepository {
    conn: SharedConnection,
}

impl SessionRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub fn save(&self, session: &StoredSession) -> DomainResult<()> {
        let conn = lock(&self.conn);
        conn.execute(
            "INSERT OR REPLACE INTO session (id, username, access_token, refresh_token) VALUES (1, ?1, ?2, ?3)",
            params![
                session.username,
                session.tokens.access_token,
                session.tokens.refresh_token
            ],
        )?;
        Ok(())
    }

    pub fn load(&self) -> DomainResult<Option<StoredSession>> {
        let conn = lock(&self.conn);
        let session = conn
            .query_row(
                "SELECT username, access_token, refresh_token FROM session WHERE id = 1",
                [],
                |row| {
                    Ok(StoredSession {
                        username: row.get(0)?,
                        tokens: AuthTokens {
                            access_token: row.get(1)?,
                            refresh_token: row.get(2)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    pub fn clear(&self) -> DomainResult<()> {
        let conn = lock(&self.conn);
        conn.execute("DELETE FROM session", ())?;
        Ok(())
    }

    pub fn get_preference(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = lock(&self.conn);
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_preference(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = lock(&self.conn);
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SessionStore for SessionRepository {
    fn load(&self) -> DomainResult<Option<StoredSession>> {
        SessionRepository::load(self)
    }

    fn save(&self, session: &StoredSession) -> DomainResult<()> {
        SessionRepository::save(self, session)
    }

    fn clear(&self) -> DomainResult<()> {
        SessionRepository::clear(self)
    }
}
