//! JSON-file backed collections.
//!
//! Both stores follow the same discipline: the whole file is read once when
//! the store is opened and the whole collection is rewritten after every
//! mutation. A missing file is an empty collection. A file that exists but
//! does not parse is an error for both stores; it is never silently replaced.

mod materials;
mod tasks;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use materials::*;
pub use tasks::*;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("material text must not be empty")]
    EmptyText,

    #[error("a deadline {0} days away is out of range")]
    DeadlineOutOfRange(i64),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a JSON array from `path`. A missing file yields an empty collection.
fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite `path` with the full collection.
///
/// The JSON is written to a sibling temp file and renamed into place so a
/// crash mid-write leaves the previous version intact.
fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(items)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

    tracing::debug!("Saved {} records to {}", items.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<u32> = load_collection(&dir.path().join("nope.json")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/items.json");

        save_collection(&path, &[1u32, 2, 3]).unwrap();

        let items: Vec<u32> = load_collection(&path).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert!(!dir.path().join("nested/deeper/items.json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Vec<u32>, _> = load_collection(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}
