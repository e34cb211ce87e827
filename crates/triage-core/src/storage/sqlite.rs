use std::path::Path;

use anyhow::Context;
use rusqlite::{params, Connection};

use super::{LogRow, LogStore};
use crate::model::LogRecord;

/// rusqlite-backed log store. One connection per session; the table is
/// written once at seed time and queried read-only afterwards.
pub struct SqliteLogStore {
    conn: Connection,
}

impl SqliteLogStore {
    /// Private in-memory table, the default for ephemeral sessions.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory log store")?;
        Self::from_connection(conn)
    }

    /// File-backed table for hosts that persist sessions across restarts.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open log store at {}", path.display()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY,
                timestamp TEXT,
                level TEXT,
                service TEXT,
                message TEXT,
                metadata TEXT
            )",
            [],
        )
        .context("create logs table")?;
        Ok(Self { conn })
    }
}

impl LogStore for SqliteLogStore {
    fn insert(&mut self, record: &LogRecord) -> anyhow::Result<()> {
        let metadata =
            serde_json::to_string(&record.metadata).context("serialize log metadata")?;
        self.conn
            .execute(
                "INSERT INTO logs (timestamp, level, service, message, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.timestamp,
                    record.level,
                    record.service,
                    record.message,
                    metadata
                ],
            )
            .context("insert log record")?;
        Ok(())
    }

    fn execute(&self, sql: &str) -> anyhow::Result<Vec<LogRow>> {
        // No extra context here: the driver message becomes the caller-visible
        // "SQL execution failed: ..." payload verbatim.
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LogRow {
                    timestamp: row.get("timestamp")?,
                    level: row.get("level")?,
                    service: row.get("service")?,
                    message: row.get("message")?,
                    metadata: row.get("metadata")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(service: &str, message: &str) -> LogRecord {
        LogRecord {
            timestamp: "2025-07-20T10:31:00Z".into(),
            level: "ERROR".into(),
            service: service.into(),
            message: message.into(),
            metadata: json!({"pool_size": 20}),
        }
    }

    #[test]
    fn insert_then_select_round_trips_columns() {
        let mut store = SqliteLogStore::open_in_memory().unwrap();
        store.insert(&record("postgres", "Connection pool exhausted")).unwrap();

        let rows = store.execute("SELECT * FROM logs").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].service, "postgres");
        assert_eq!(rows[0].message, "Connection pool exhausted");
        assert_eq!(rows[0].metadata.as_deref(), Some(r#"{"pool_size":20}"#));
    }

    #[test]
    fn execute_fails_on_missing_columns() {
        let mut store = SqliteLogStore::open_in_memory().unwrap();
        store.insert(&record("postgres", "x")).unwrap();
        assert!(store.execute("SELECT service FROM logs").is_err());
        assert!(store.execute("SELECT nope FROM logs").is_err());
    }

    #[test]
    fn file_backed_store_persists_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.db");
        {
            let mut store = SqliteLogStore::open(&path).unwrap();
            store.insert(&record("web-app", "Database timeout after 5000ms")).unwrap();
        }
        let store = SqliteLogStore::open(&path).unwrap();
        let rows = store.execute("SELECT * FROM logs").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].service, "web-app");
    }
}
