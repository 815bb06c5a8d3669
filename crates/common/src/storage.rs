//! Well-known storage areas shared by every module in the process.
//!
//! Areas live under the data dir (`~/.wharf` by default):
//! `files/` for persistent module output, `downloads/` for retrieved
//! content, `temp/` for scratch files. Area roots are created on first
//! use; the files inside them are entirely the modules' business.

use std::{
    path::{Component, Path, PathBuf},
    sync::RwLock,
};

use {serde::{Deserialize, Serialize}, tracing::debug};

use crate::error::{Error, Result};

/// One of the shared directories modules may resolve names into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Files,
    Downloads,
    Temp,
}

impl StorageArea {
    pub const ALL: [StorageArea; 3] = [Self::Files, Self::Downloads, Self::Temp];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Downloads => "downloads",
            Self::Temp => "temp",
        }
    }
}

impl std::str::FromStr for StorageArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "files" => Ok(Self::Files),
            "downloads" => Ok(Self::Downloads),
            "temp" => Ok(Self::Temp),
            other => Err(Error::message(format!("unknown storage area: {other}"))),
        }
    }
}

static DATA_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Returns the wharf data directory (`~/.wharf`).
///
/// An override set via [`set_data_dir`] takes precedence; tests use this to
/// point the storage areas at a temp dir.
pub fn data_dir() -> PathBuf {
    if let Ok(guard) = DATA_DIR_OVERRIDE.read()
        && let Some(dir) = guard.as_ref()
    {
        return dir.clone();
    }
    directories::UserDirs::new()
        .map(|d| d.home_dir().join(".wharf"))
        .unwrap_or_else(|| PathBuf::from(".wharf"))
}

/// Override the data directory for this process.
pub fn set_data_dir(path: impl Into<PathBuf>) {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = Some(path.into());
    }
}

/// Clear a [`set_data_dir`] override, restoring the default location.
pub fn clear_data_dir() {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// Root directory of `area` under the current data dir.
pub fn area_root(area: StorageArea) -> PathBuf {
    data_dir().join(area.dir_name())
}

/// Resolve `name` to an absolute path inside `area`.
///
/// Creates the area root if it does not exist yet (idempotent) but never
/// touches the file itself — existence checks belong to the caller. Names
/// may contain subdirectories; parent-dir and rooted components are
/// rejected so the result is always a descendant of the area root.
pub fn file_path(name: &str, area: StorageArea) -> Result<PathBuf> {
    let rel = sanitize_name(name)?;
    let root = area_root(area);
    if !root.exists() {
        std::fs::create_dir_all(&root)?;
        debug!(area = area.dir_name(), root = %root.display(), "created storage area");
    }
    Ok(root.join(rel))
}

/// Validate that `name` is a safe relative path.
fn sanitize_name(name: &str) -> Result<&Path> {
    let rel = Path::new(name);
    if rel.as_os_str().is_empty() {
        return Err(Error::invalid_reference(name, "empty name"));
    }
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {},
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::invalid_reference(
                    name,
                    "path escapes its storage area",
                ));
            },
        }
    }
    Ok(rel)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // file_path reads the process-wide data dir, so tests that repoint it
    // must not interleave.
    static DATA_DIR_LOCK: Mutex<()> = Mutex::new(());

    fn scoped_data_dir() -> (MutexGuard<'static, ()>, tempfile::TempDir) {
        let guard = DATA_DIR_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        set_data_dir(tmp.path());
        (guard, tmp)
    }

    #[test]
    fn resolves_under_area_root() {
        let (_guard, tmp) = scoped_data_dir();
        let path = file_path("notes.txt", StorageArea::Files).unwrap();
        assert_eq!(path, tmp.path().join("files/notes.txt"));
        // Root is created, the file is not.
        assert!(tmp.path().join("files").is_dir());
        assert!(!path.exists());
        clear_data_dir();
    }

    #[test]
    fn area_creation_is_idempotent() {
        let (_guard, _tmp) = scoped_data_dir();
        let first = file_path("a.txt", StorageArea::Temp).unwrap();
        let second = file_path("a.txt", StorageArea::Temp).unwrap();
        assert_eq!(first, second);
        clear_data_dir();
    }

    #[test]
    fn subdirectories_are_allowed() {
        let (_guard, tmp) = scoped_data_dir();
        let path = file_path("reports/2026/q1.csv", StorageArea::Downloads).unwrap();
        assert!(path.starts_with(tmp.path().join("downloads")));
        clear_data_dir();
    }

    #[test]
    fn rejects_parent_traversal() {
        let (_guard, _tmp) = scoped_data_dir();
        let err = file_path("../escape.txt", StorageArea::Files).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
        let err = file_path("ok/../../escape.txt", StorageArea::Files).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
        clear_data_dir();
    }

    #[test]
    fn rejects_rooted_names() {
        let (_guard, _tmp) = scoped_data_dir();
        let err = file_path("/etc/passwd", StorageArea::Files).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
        let err = file_path("", StorageArea::Files).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
        clear_data_dir();
    }

    #[test]
    fn area_names_round_trip() {
        for area in StorageArea::ALL {
            let parsed: StorageArea = area.dir_name().parse().unwrap();
            assert_eq!(parsed, area);
        }
        assert!("attic".parse::<StorageArea>().is_err());
    }
}
