//! Content log — append-only record of everything sent, received, or
//! declined, backed by SQLite.
//!
//! The connection is serialized behind a mutex and every call hops to the
//! blocking pool, keeping the reactor free of disk waits.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};

use crate::content::ContentKind;

#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("content log query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("content log task failed: {0}")]
    Background(String),
    #[error("failed to open content log at {0}: {1}")]
    Open(std::path::PathBuf, rusqlite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
    Declined,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
            Direction::Declined => "declined",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "sent" => Direction::Sent,
            "declined" => Direction::Declined,
            _ => Direction::Received,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Failed,
    Declined,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
            LogStatus::Declined => "declined",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "failed" => LogStatus::Failed,
            "declined" => LogStatus::Declined,
            _ => LogStatus::Success,
        }
    }
}

impl ContentKind {
    fn parse(s: &str) -> Self {
        match s {
            "file" => ContentKind::File,
            _ => ContentKind::Text,
        }
    }
}

/// A row to append.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub direction: Direction,
    pub device_name: String,
    pub content: String,
    pub content_type: ContentKind,
    pub status: LogStatus,
    pub file_size: Option<u64>,
    pub file_name: Option<String>,
}

/// A stored row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub direction: Direction,
    pub device_name: String,
    pub content: String,
    pub content_type: ContentKind,
    pub status: LogStatus,
    pub file_size: Option<u64>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogFilter {
    pub direction: Option<Direction>,
    /// Substring match on the device name.
    pub device_name: Option<String>,
    pub content_type: Option<ContentKind>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS content_logs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp    DATETIME DEFAULT CURRENT_TIMESTAMP,
    direction    TEXT NOT NULL CHECK (direction IN ('sent', 'received', 'declined')),
    device_name  TEXT NOT NULL,
    content      TEXT NOT NULL,
    content_type TEXT NOT NULL CHECK (content_type IN ('text', 'file')),
    status       TEXT NOT NULL CHECK (status IN ('success', 'failed', 'declined')),
    file_size    INTEGER,
    file_name    TEXT
)";

#[derive(Clone)]
pub struct ContentLogStore {
    conn: Arc<Mutex<Connection>>,
}

impl ContentLogStore {
    pub fn open(path: &Path) -> Result<Self, LogStoreError> {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "failed to create content log directory");
            }
        }
        let conn =
            Connection::open(path).map_err(|e| LogStoreError::Open(path.to_path_buf(), e))?;
        conn.execute(SCHEMA, [])?;
        tracing::info!(path = %path.display(), "content log opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, LogStoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn record(&self, record: LogRecord) -> Result<(), LogStoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO content_logs
                 (direction, device_name, content, content_type, status, file_size, file_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    record.direction.as_str(),
                    record.device_name,
                    record.content,
                    record.content_type.as_str(),
                    record.status.as_str(),
                    record.file_size.map(|s| s as i64),
                    record.file_name,
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Filtered rows, most recent first.
    pub async fn recent(&self, filter: LogFilter) -> Result<Vec<LogEntry>, LogStoreError> {
        self.with_conn(move |conn| {
            let (where_sql, params) = build_where(&filter);
            let mut sql = format!(
                "SELECT id, timestamp, direction, device_name, content, content_type,
                        status, file_size, file_name
                 FROM content_logs{where_sql}
                 ORDER BY id DESC"
            );
            if let Some(limit) = filter.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = filter.offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }

            let mut stmt = conn.prepare(&sql)?;
            let refs: Vec<&dyn ToSql> = params.iter().map(|p| &**p as &dyn ToSql).collect();
            let rows = stmt.query_map(refs.as_slice(), |row| {
                Ok(LogEntry {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    direction: Direction::parse(&row.get::<_, String>(2)?),
                    device_name: row.get(3)?,
                    content: row.get(4)?,
                    content_type: ContentKind::parse(&row.get::<_, String>(5)?),
                    status: LogStatus::parse(&row.get::<_, String>(6)?),
                    file_size: row.get::<_, Option<i64>>(7)?.map(|s| s as u64),
                    file_name: row.get(8)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
    }

    pub async fn count(&self, filter: LogFilter) -> Result<u64, LogStoreError> {
        self.with_conn(move |conn| {
            let (where_sql, params) = build_where(&filter);
            let sql = format!("SELECT COUNT(*) FROM content_logs{where_sql}");
            let refs: Vec<&dyn ToSql> = params.iter().map(|p| &**p as &dyn ToSql).collect();
            let count: i64 = conn.query_row(&sql, refs.as_slice(), |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    pub async fn clear(&self) -> Result<u64, LogStoreError> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM content_logs", [])?;
            Ok(removed as u64)
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, LogStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&conn)
        })
        .await
        .map_err(|e| LogStoreError::Background(e.to_string()))?
        .map_err(LogStoreError::Sqlite)
    }
}

fn build_where(filter: &LogFilter) -> (String, Vec<Box<dyn ToSql + Send>>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql + Send>> = Vec::new();

    if let Some(direction) = filter.direction {
        clauses.push("direction = ?");
        params.push(Box::new(direction.as_str().to_string()));
    }
    if let Some(device) = &filter.device_name {
        clauses.push("device_name LIKE ?");
        params.push(Box::new(format!("%{device}%")));
    }
    if let Some(kind) = filter.content_type {
        clauses.push("content_type = ?");
        params.push(Box::new(kind.as_str().to_string()));
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}
