//! Filesystem page store

use super::{PageStore, PageStoreError, PageStoreResult, StoredPage};
use crate::hash::fnv1a_str;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::Builder;

/// File name of the page stored for `url`: its FNV-1a hash in decimal
pub fn page_file_name(url: &str) -> String {
    format!("{}.json", fnv1a_str(url))
}

/// Page store writing one JSON file per page into a directory
pub struct FsPageStore {
    dir: PathBuf,
    // Serializes every filesystem access made through the store
    lock: Mutex<()>,
}

impl FsPageStore {
    /// Opens a page directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> PageStoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file stored for `url`
    pub fn page_path(&self, url: &str) -> PathBuf {
        self.dir.join(page_file_name(url))
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageStore for FsPageStore {
    fn is_fetched(&self, url: &str) -> PageStoreResult<bool> {
        let _guard = self.guard();
        match fs::metadata(self.page_path(url)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, page: &StoredPage) -> PageStoreResult<bool> {
        let json = serde_json::to_vec(page)?;

        let _guard = self.guard();
        let path = self.page_path(&page.url);
        if path.exists() {
            return Ok(false);
        }

        // The page only appears under its final name once fully written;
        // a failed write leaves no file behind
        let mut file = Builder::new()
            .prefix(".page-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        file.write_all(&json)?;
        file.as_file().sync_data()?;

        match file.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(PageStoreError::Io(e.error)),
        }
    }

    fn count(&self) -> PageStoreResult<u64> {
        let _guard = self.guard();
        let mut count = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
