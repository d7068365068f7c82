//! Persistent store for busboard.
//!
//! A `SQLite`-backed key-value store holding JSON documents for the roster,
//! day logs, templates, and complaints, with a one-shot import of data left
//! behind by the previous application version.
//!
//! Persistence is best-effort by design: if the backend cannot be opened the
//! store degrades to a no-op handle, and every public accessor swallows
//! backend errors (logging a warning) instead of surfacing them to the
//! caller. A failed write is simply lost; the next successful write for that
//! key is authoritative.

pub mod legacy;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::roster::{BusRecord, Complaint, DayLog, Template};

/// Fixed keys under which record collections are persisted.
pub mod keys {
    /// Current roster snapshot.
    pub const ROSTER: &str = "roster";
    /// Historical day logs, newest first.
    pub const DAY_LOGS: &str = "day-logs";
    /// Saved roster templates.
    pub const TEMPLATES: &str = "templates";
    /// Complaint records, newest first.
    pub const COMPLAINTS: &str = "complaints";
}

/// Durable key-value store handle.
///
/// Owned by the application root and acquired once at startup via
/// [`Store::open`]. All accessors take `&self`; operations on a single key
/// are serialized in submission order by the underlying connection.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection; `None` when the backend is unavailable.
    conn: Option<Connection>,
    /// Directory scanned for legacy per-key files.
    legacy_dir: Option<PathBuf>,
    /// Day-log retention cap (oldest evicted first).
    max_day_logs: usize,
}

impl Store {
    /// Open the store described by the configuration.
    ///
    /// Runs schema initialization and the one-shot legacy import before
    /// returning. Never fails: if the backend cannot be opened the returned
    /// handle is a no-op and a warning is logged.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        let path = config.database_path();
        let legacy_dir = config.legacy_dir();

        let conn = match Self::try_open(&path) {
            Ok(conn) => {
                info!("store opened at {}", path.display());
                Some(conn)
            }
            Err(e) => {
                warn!("store unavailable, persistence disabled: {e}");
                None
            }
        };

        let store = Self {
            path,
            conn,
            legacy_dir: Some(legacy_dir),
            max_day_logs: config.storage.max_day_logs,
        };
        store.import_legacy();
        store
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Some(conn),
            legacy_dir: None,
            max_day_logs: crate::config::DEFAULT_MAX_DAY_LOGS,
        })
    }

    fn try_open(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("opening database at {}", path.display());
        let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        // WAL mode for crash resilience on abrupt shutdown
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;
        Ok(conn)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backend is available (false for a degraded no-op handle).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    // === Legacy import ===

    /// Copy each legacy per-key file into the store if its key is still
    /// empty, deleting the file afterwards. Corrupt files are skipped and
    /// left in place; running the import again is a no-op.
    fn import_legacy(&self) {
        if self.conn.is_none() {
            return;
        }
        let Some(dir) = &self.legacy_dir else {
            return;
        };

        for entry in legacy::LEGACY_KEYS {
            let existing = match self.try_get(entry.store_key) {
                Ok(v) => v,
                Err(e) => {
                    warn!("legacy import: read of '{}' failed: {e}", entry.store_key);
                    continue;
                }
            };
            if existing.is_some() {
                continue;
            }

            let path = legacy::legacy_path(dir, entry.file_name);
            let Some(value) = legacy::read_value(&path) else {
                continue;
            };

            match self.try_set(entry.store_key, &value) {
                Ok(()) => {
                    info!(
                        "migrated legacy data '{}' to key '{}'",
                        entry.file_name, entry.store_key
                    );
                    legacy::remove_file(&path);
                }
                Err(e) => warn!("legacy import of '{}' failed: {e}", entry.file_name),
            }
        }
    }

    // === Key-value API ===

    /// Read the raw JSON value stored under a key.
    ///
    /// Returns `None` if the key is missing, the backend is unavailable, or
    /// the stored value fails to parse; storage problems never surface to
    /// the caller.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("read of key '{key}' failed: {e}");
                None
            }
        }
    }

    /// Read and deserialize the value stored under a key.
    ///
    /// A value that does not match the expected shape is treated as absent.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!("stored value for key '{key}' has unexpected shape: {e}");
                None
            }
        }
    }

    /// Store a value under a key, overwriting any existing value.
    ///
    /// The write is atomic and fire-and-forget: failures are logged and
    /// swallowed. A subsequent `get` on this handle observes the new value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("could not serialize value for key '{key}': {e}");
                return;
            }
        };
        if let Err(e) = self.try_set(key, &value) {
            warn!("write of key '{key}' failed: {e}");
        }
    }

    /// Delete the value stored under a key (fire-and-forget).
    pub fn delete(&self, key: &str) {
        let Some(conn) = &self.conn else { return };
        if let Err(e) = conn.execute("DELETE FROM kv WHERE key = ?1", [key]) {
            warn!("delete of key '{key}' failed: {e}");
        }
    }

    /// Read every key and its value, for full backup export.
    ///
    /// Returns an empty mapping if the backend is unavailable.
    #[must_use]
    pub fn get_all(&self) -> Map<String, Value> {
        match self.try_get_all() {
            Ok(map) => map,
            Err(e) => {
                warn!("backup export failed: {e}");
                Map::new()
            }
        }
    }

    /// Erase every key in the store and any legacy-location duplicates.
    ///
    /// Idempotent; failures are logged and swallowed.
    pub fn clear_all(&self) {
        if let Some(conn) = &self.conn {
            if let Err(e) = conn.execute("DELETE FROM kv", []) {
                warn!("clear failed: {e}");
            }
        }
        if let Some(dir) = &self.legacy_dir {
            for entry in legacy::LEGACY_KEYS {
                let path = legacy::legacy_path(dir, entry.file_name);
                if path.exists() {
                    legacy::remove_file(&path);
                }
            }
        }
    }

    fn try_get(&self, key: &str) -> Result<Option<Value>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        match raw {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // Corrupt record: treated as absent, never thrown
                    warn!("stored value for key '{key}' is corrupt: {e}");
                    Ok(None)
                }
            },
        }
    }

    fn try_set(&self, key: &str, value: &Value) -> Result<()> {
        let Some(conn) = &self.conn else {
            return Ok(());
        };
        let raw = serde_json::to_string(value)?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, raw],
        )?;
        Ok(())
    }

    fn try_get_all(&self) -> Result<Map<String, Value>> {
        let Some(conn) = &self.conn else {
            return Ok(Map::new());
        };
        let mut stmt = conn.prepare("SELECT key, value FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let raw: String = row.get(1)?;
            Ok((key, raw))
        })?;

        let mut map = Map::new();
        for row in rows {
            let (key, raw) = row?;
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    map.insert(key, value);
                }
                Err(e) => warn!("skipping corrupt value for key '{key}' in export: {e}"),
            }
        }
        Ok(map)
    }

    // === Typed record accessors ===

    /// The current roster (empty if none is stored).
    #[must_use]
    pub fn roster(&self) -> Vec<BusRecord> {
        self.get_as(keys::ROSTER).unwrap_or_default()
    }

    /// Persist the current roster snapshot.
    pub fn save_roster(&self, buses: &[BusRecord]) {
        self.set(keys::ROSTER, &buses);
    }

    /// All day logs, newest first (empty if none are stored).
    #[must_use]
    pub fn day_logs(&self) -> Vec<DayLog> {
        self.get_as(keys::DAY_LOGS).unwrap_or_default()
    }

    /// Snapshot the given roster as a new day log.
    ///
    /// The new log is prepended (newest first) and the list is truncated to
    /// the retention cap, evicting the oldest. An empty roster is not
    /// logged; returns the created log, or `None` for an empty roster.
    pub fn save_day_log(&self, buses: &[BusRecord]) -> Option<DayLog> {
        if buses.is_empty() {
            return None;
        }
        let log = DayLog::from_roster(buses);
        let mut logs = self.day_logs();
        logs.insert(0, log.clone());
        logs.truncate(self.max_day_logs);
        self.set(keys::DAY_LOGS, &logs);
        Some(log)
    }

    /// Delete the day log with the given identifier.
    pub fn delete_day_log(&self, id: &str) {
        let logs: Vec<DayLog> = self
            .day_logs()
            .into_iter()
            .filter(|l| l.id != id)
            .collect();
        self.set(keys::DAY_LOGS, &logs);
    }

    /// All saved templates (empty if none are stored).
    #[must_use]
    pub fn templates(&self) -> Vec<Template> {
        self.get_as(keys::TEMPLATES).unwrap_or_default()
    }

    /// Save a template, overwriting any existing template with the same id.
    pub fn save_template(&self, template: &Template) {
        let mut templates = self.templates();
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => templates.push(template.clone()),
        }
        self.set(keys::TEMPLATES, &templates);
    }

    /// Delete the template with the given identifier.
    pub fn delete_template(&self, id: &str) {
        let templates: Vec<Template> = self
            .templates()
            .into_iter()
            .filter(|t| t.id != id)
            .collect();
        self.set(keys::TEMPLATES, &templates);
    }

    /// All complaints, newest first (empty if none are stored).
    #[must_use]
    pub fn complaints(&self) -> Vec<Complaint> {
        self.get_as(keys::COMPLAINTS).unwrap_or_default()
    }

    /// Record a complaint (prepended, newest first).
    pub fn save_complaint(&self, complaint: &Complaint) {
        let mut complaints = self.complaints();
        complaints.insert(0, complaint.clone());
        self.set(keys::COMPLAINTS, &complaints);
    }

    /// Delete the complaint with the given identifier.
    pub fn delete_complaint(&self, id: &str) {
        let complaints: Vec<Complaint> = self
            .complaints()
            .into_iter()
            .filter(|c| c.id != id)
            .collect();
        self.set(keys::COMPLAINTS, &complaints);
    }
}
