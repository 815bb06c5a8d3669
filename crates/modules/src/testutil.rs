//! Shared fixtures for tests that repoint the storage areas.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use wharf_common::storage;

// The data dir is process-wide; tests that override it must not interleave.
static DATA_DIR_LOCK: Mutex<()> = Mutex::new(());

/// Points the storage areas at a fresh temp dir until dropped.
pub struct ScopedDataDir {
    tmp: tempfile::TempDir,
    _guard: MutexGuard<'static, ()>,
}

impl ScopedDataDir {
    pub fn path(&self) -> &Path {
        self.tmp.path()
    }
}

impl Drop for ScopedDataDir {
    fn drop(&mut self) {
        storage::clear_data_dir();
    }
}

pub fn scoped_data_dir() -> ScopedDataDir {
    let guard = DATA_DIR_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let tmp = tempfile::tempdir().expect("tempdir");
    storage::set_data_dir(tmp.path());
    ScopedDataDir { tmp, _guard: guard }
}
