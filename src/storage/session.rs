use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::database::Database;
use crate::common::TokenPair;

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";

/// Session credentials persisted in the local key/value table.
///
/// Cloning is cheap and every clone sees the same store, so the API client
/// and its spawned requests share one session. Both tokens are always written
/// and removed by a single statement.
#[derive(Clone)]
pub struct Session {
    db: Arc<Mutex<Database>>,
}

impl Session {
    /// Open (or create) the session store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Ok(Self::with_database(Database::open(path)?))
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        Ok(Self::with_database(Database::in_memory()?))
    }

    fn with_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get(&self, key: &str) -> SqlResult<Option<String>> {
        let db = self.lock();
        db.connection()
            .query_row(
                "SELECT value FROM client_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn access_token(&self) -> SqlResult<Option<String>> {
        self.get(ACCESS_KEY)
    }

    pub fn refresh_token(&self) -> SqlResult<Option<String>> {
        self.get(REFRESH_KEY)
    }

    pub fn is_authenticated(&self) -> SqlResult<bool> {
        Ok(self.access_token()?.is_some())
    }

    /// Replace both tokens
    pub fn store(&self, tokens: &TokenPair) -> SqlResult<()> {
        let db = self.lock();
        db.connection().execute(
            "INSERT OR REPLACE INTO client_state (key, value) VALUES (?1, ?2), (?3, ?4)",
            params![ACCESS_KEY, tokens.access, REFRESH_KEY, tokens.refresh],
        )?;
        Ok(())
    }

    /// Remove both tokens
    pub fn clear(&self) -> SqlResult<()> {
        let db = self.lock();
        db.connection().execute(
            "DELETE FROM client_state WHERE key IN (?1, ?2)",
            params![ACCESS_KEY, REFRESH_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> TokenPair {
        TokenPair {
            access: "access-1".to_string(),
            refresh: "refresh-1".to_string(),
        }
    }

    #[test]
    fn empty_store_has_no_tokens() {
        let session = Session::in_memory().unwrap();
        assert_eq!(session.access_token().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn store_then_clear_removes_both_tokens() {
        let session = Session::in_memory().unwrap();
        session.store(&tokens()).unwrap();
        assert_eq!(session.access_token().unwrap().as_deref(), Some("access-1"));
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("refresh-1"));

        session.clear().unwrap();
        assert_eq!(session.access_token().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
    }

    #[test]
    fn store_overwrites_previous_pair() {
        let session = Session::in_memory().unwrap();
        session.store(&tokens()).unwrap();
        session
            .store(&TokenPair {
                access: "access-2".to_string(),
                refresh: "refresh-2".to_string(),
            })
            .unwrap();
        assert_eq!(session.access_token().unwrap().as_deref(), Some("access-2"));
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("refresh-2"));
    }

    #[test]
    fn clones_share_one_store() {
        let session = Session::in_memory().unwrap();
        let other = session.clone();
        session.store(&tokens()).unwrap();
        other.clear().unwrap();
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn tokens_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.db");

        Session::open(&path).unwrap().store(&tokens()).unwrap();

        let reopened = Session::open(&path).unwrap();
        assert_eq!(reopened.access_token().unwrap().as_deref(), Some("access-1"));
    }
}
