use rusqlite::{Connection, Result as SqlResult};
use std::path::Path;

/// Key/value table for client-local state. Values are opaque strings.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS client_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Client SQLite file, schema applied on open
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::with_schema(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> SqlResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
