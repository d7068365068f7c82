//! One-shot import of legacy storage into the store.
//!
//! The previous application version persisted each record collection as a
//! loose JSON file (`<legacy-dir>/<name>.json`). On startup the store copies
//! each file into the key-value table if the target key is still empty, then
//! deletes the file. Corrupt files are skipped and left in place, so the
//! import is retried on the next startup; re-running the import after a
//! successful pass is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use super::keys;

/// One entry of the legacy migration table.
#[derive(Debug, Clone, Copy)]
pub struct LegacyKey {
    /// File name (without extension) in the legacy directory.
    pub file_name: &'static str,
    /// Store key the value migrates to.
    pub store_key: &'static str,
}

/// The fixed set of legacy keys eligible for migration.
pub const LEGACY_KEYS: &[LegacyKey] = &[
    LegacyKey {
        file_name: "bus-organizer-session",
        store_key: keys::ROSTER,
    },
    LegacyKey {
        file_name: "bus-organizer-templates",
        store_key: keys::TEMPLATES,
    },
    LegacyKey {
        file_name: "bus-organizer-logs",
        store_key: keys::DAY_LOGS,
    },
];

/// Path of a legacy file inside the legacy directory.
#[must_use]
pub fn legacy_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!("{file_name}.json"))
}

/// Read and parse a legacy file.
///
/// Returns `None` if the file is missing or does not parse as JSON; a
/// corrupt file is logged and left for the operator to inspect.
#[must_use]
pub fn read_value(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("skipping corrupt legacy file {}: {e}", path.display());
            None
        }
    }
}

/// Delete a legacy file after successful migration (best effort).
pub fn remove_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove migrated legacy file {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_legacy_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "busboard_legacy_test_{}_{:p}",
            std::process::id(),
            &LEGACY_KEYS
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_legacy_keys_cover_expected_collections() {
        let store_keys: Vec<&str> = LEGACY_KEYS.iter().map(|k| k.store_key).collect();
        assert!(store_keys.contains(&keys::ROSTER));
        assert!(store_keys.contains(&keys::TEMPLATES));
        assert!(store_keys.contains(&keys::DAY_LOGS));
    }

    #[test]
    fn test_legacy_path_appends_json_extension() {
        let path = legacy_path(Path::new("/data/legacy"), "bus-organizer-session");
        assert_eq!(
            path,
            PathBuf::from("/data/legacy/bus-organizer-session.json")
        );
    }

    #[test]
    fn test_read_value_missing_file() {
        assert!(read_value(Path::new("/nonexistent/file.json")).is_none());
    }

    #[test]
    fn test_read_value_valid_and_corrupt() {
        let dir = temp_legacy_dir();

        let valid = dir.join("valid.json");
        fs::write(&valid, r#"[{"a": 1}]"#).unwrap();
        assert!(read_value(&valid).is_some());

        let corrupt = dir.join("corrupt.json");
        fs::write(&corrupt, "{not json").unwrap();
        assert!(read_value(&corrupt).is_none());
        // Corrupt files are left in place
        assert!(corrupt.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_remove_file_best_effort() {
        let dir = temp_legacy_dir();
        let path = dir.join("gone.json");
        fs::write(&path, "[]").unwrap();

        remove_file(&path);
        assert!(!path.exists());

        // Removing a missing file must not panic
        remove_file(&path);

        let _ = fs::remove_dir_all(&dir);
    }
}
