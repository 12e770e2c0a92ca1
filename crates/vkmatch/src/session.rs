//! Local session store.
//!
//! The only state persisted on the client is the session token and the
//! UI theme/language preference, kept in a small SQLite key/value table.
//! Everything else lives on the backend.

use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};

use crate::error::VkmError;
use crate::locale::{Language, Theme};

const SCHEMA_SQL: &str = include_str!("../../../sql/init_session.sql");

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "vkm_session_token";
/// Storage key for the UI theme.
pub const THEME_KEY: &str = "vkm_theme";
/// Storage key for the UI language.
pub const LANGUAGE_KEY: &str = "vkm_language";

pub struct SessionStore {
    db: Mutex<Connection>,
}

impl SessionStore {
    /// Opens (or creates) the session store at the given path.
    pub fn open(db_path: &str) -> Result<Self, VkmError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Opens an in-memory store; state is gone when the store is dropped.
    pub fn in_memory() -> Result<Self, VkmError> {
        Self::open(":memory:")
    }

    fn get(&self, key: &str) -> Result<Option<String>, VkmError> {
        let db = self.lock()?;
        let value = db
            .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VkmError> {
        let db = self.lock()?;
        db.execute(
            "INSERT INTO session (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value),
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), VkmError> {
        let db = self.lock()?;
        db.execute("DELETE FROM session WHERE key = ?1", [key])?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, VkmError> {
        self.db.lock().map_err(|_| VkmError::Storage {
            message: "session store lock poisoned".to_string(),
        })
    }

    /// Returns the stored bearer token, if any.
    pub fn token(&self) -> Result<Option<String>, VkmError> {
        self.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<(), VkmError> {
        self.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), VkmError> {
        self.delete(TOKEN_KEY)
    }

    /// Returns the stored theme, defaulting to light.
    pub fn theme(&self) -> Result<Theme, VkmError> {
        Ok(self
            .get(THEME_KEY)?
            .map(|v| Theme::from_stored(&v))
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), VkmError> {
        self.set(THEME_KEY, theme.as_str())
    }

    /// Returns the stored language, defaulting to Dutch.
    pub fn language(&self) -> Result<Language, VkmError> {
        Ok(self
            .get(LANGUAGE_KEY)?
            .map(|v| Language::from_stored(&v))
            .unwrap_or_default())
    }

    pub fn set_language(&self, language: Language) -> Result<(), VkmError> {
        self.set(LANGUAGE_KEY, language.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let store = SessionStore::in_memory().unwrap();
        assert_eq!(store.token().unwrap(), None);

        store.set_token("abc.def.ghi").unwrap();
        assert_eq!(store.token().unwrap(), Some("abc.def.ghi".to_string()));

        store.set_token("new-token").unwrap();
        assert_eq!(store.token().unwrap(), Some("new-token".to_string()));

        store.clear_token().unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn preferences_default_and_persist() {
        let store = SessionStore::in_memory().unwrap();
        assert_eq!(store.theme().unwrap(), Theme::Light);
        assert_eq!(store.language().unwrap(), Language::Nl);

        store.set_theme(Theme::Dark).unwrap();
        store.set_language(Language::En).unwrap();
        assert_eq!(store.theme().unwrap(), Theme::Dark);
        assert_eq!(store.language().unwrap(), Language::En);
    }

    #[test]
    fn clearing_token_keeps_preferences() {
        let store = SessionStore::in_memory().unwrap();
        store.set_token("t").unwrap();
        store.set_theme(Theme::Dark).unwrap();

        store.clear_token().unwrap();
        assert_eq!(store.theme().unwrap(), Theme::Dark);
    }
}
