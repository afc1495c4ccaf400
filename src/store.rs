use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::record::ImportedRecord;

/// Key-value persistence for records, keyed by record id.
pub trait RecordStore {
    fn get(&self, id: &str) -> Result<Option<ImportedRecord>>;
    /// Insert or replace. The stored copy is stamped with `lastModified`.
    fn put(&self, record: &ImportedRecord) -> Result<()>;
    /// Every record, ordered by name then id.
    fn list_all(&self) -> Result<Vec<ImportedRecord>>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {:?}", dir))?;
        }
        let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                last_modified TEXT NOT NULL,
                data          TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_records_name ON records(name);
            ",
        )?;
        Ok(SqliteStore { conn })
    }

    /// Write a batch in one transaction, all stamped with the same time.
    pub fn put_many(&self, records: &[ImportedRecord]) -> Result<usize> {
        let now = Utc::now();
        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO records (id, name, last_modified, data)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                let mut stamped = record.clone();
                stamped.last_modified = Some(now);
                let data = serde_json::to_string(&stamped)?;
                count += stmt.execute(rusqlite::params![
                    stamped.id,
                    stamped.name,
                    now.to_rfc3339(),
                    data,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count, "records written");
        Ok(count)
    }

    pub fn count(&self) -> Result<usize> {
        let n: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;
        Ok(n)
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, id: &str) -> Result<Option<ImportedRecord>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM records WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        data.map(|d| {
            serde_json::from_str(&d).with_context(|| format!("Corrupt record {}", id))
        })
        .transpose()
    }

    fn put(&self, record: &ImportedRecord) -> Result<()> {
        self.put_many(std::slice::from_ref(record))?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<ImportedRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, data FROM records ORDER BY name, id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(id, data)| {
                serde_json::from_str(&data).with_context(|| format!("Corrupt record {}", id))
            })
            .collect()
    }
}
