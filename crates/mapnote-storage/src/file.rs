//! The database file of a store directory.
//!
//! A store directory holds exactly one document, `database.json`. Writes go to
//! `database.json.tmp` first and are renamed over the target, so a reader (or
//! a crash) sees either the previous file or the new one, never a mix.

use crate::codec::{decode_slice, encode, EncodeOptions};
use crate::{StorageError, StorageResult};
use mapnote_model::Snapshot;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the document inside a store directory.
pub const DATABASE_FILE_NAME: &str = "database.json";

const TEMP_SUFFIX: &str = ".tmp";

/// How [`DatabaseFile::write`] writes.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Indent the document.
    pub pretty: bool,
    /// Sync the file and its directory before returning.
    pub fsync: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            fsync: true,
        }
    }
}

/// Handle on `<dir>/database.json`. Holds no open file between calls.
#[derive(Debug, Clone)]
pub struct DatabaseFile {
    dir: PathBuf,
    path: PathBuf,
    options: WriteOptions,
}

impl DatabaseFile {
    /// The database file of the store directory `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(DATABASE_FILE_NAME);
        Self {
            dir,
            path,
            options: WriteOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a write stages the new document before the rename.
    pub fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{DATABASE_FILE_NAME}{TEMP_SUFFIX}"))
    }

    pub fn options(&self) -> WriteOptions {
        self.options
    }

    /// Read and decode the file; `Ok(None)` if there is no file yet.
    pub fn read(&self) -> StorageResult<Option<Snapshot>> {
        debug!(path = %self.path.display(), "Reading database");

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        Ok(Some(decode_slice(&bytes)?))
    }

    /// Encode `snapshot` and atomically replace the file with it.
    ///
    /// On failure the previous file, if any, is left untouched.
    pub fn write(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let text = encode(
            snapshot,
            EncodeOptions {
                pretty: self.options.pretty,
            },
        )?;
        debug!(path = %self.path.display(), bytes = text.len(), "Writing database");

        let temp = self.temp_path();
        if let Err(err) = self.replace_with(&temp, text.as_bytes()) {
            discard(&temp);
            return Err(err);
        }

        if self.options.fsync {
            sync_dir(&self.dir);
        }
        Ok(())
    }

    fn replace_with(&self, temp: &Path, bytes: &[u8]) -> StorageResult<()> {
        let mut file = File::create(temp).map_err(|e| StorageError::io(temp, e))?;
        file.write_all(bytes).map_err(|e| StorageError::io(temp, e))?;
        if self.options.fsync {
            file.sync_all().map_err(|e| StorageError::io(temp, e))?;
        }
        drop(file);

        fs::rename(temp, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }
}

fn discard(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %temp.display(), error = %e, "Failed to remove temporary database file");
        }
    }
}

/// Persist the rename itself. Best effort: not every platform or file system
/// lets a directory be opened and synced.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), error = %e, "Directory sync skipped");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
