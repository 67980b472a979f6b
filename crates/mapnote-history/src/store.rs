//! A history bound to a store directory.

use crate::{History, StoreError, StoreResult};
use mapnote_model::{Floor, Snapshot};
use mapnote_storage::{CodecError, DatabaseFile, WriteOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for a store.
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Indent the saved document.
    pub pretty: bool,

    /// Sync the database file and directory on every save.
    pub fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            fsync: true,
        }
    }
}

/// A versioned document kept in one directory.
///
/// The directory holds the document as `database.json`, and floor map files
/// at the paths the floors name. The store never reads the map files.
/// ```text
/// directory/
///   database.json       # current snapshot
///   database.json.tmp   # only while saving
///   <floor map paths>
/// ```
///
/// Mutating operations take `&mut self`; a store has exactly one owner.
#[derive(Debug)]
pub struct Store {
    directory: PathBuf,
    file: DatabaseFile,
    history: History,
}

impl Store {
    /// Open the store in `directory` with the default configuration.
    pub fn open(directory: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_config(directory, StoreConfig::default())
    }

    /// Open the store in `directory`.
    ///
    /// The directory must exist. Without a `database.json` the store starts
    /// from the empty snapshot; nothing is written until [`Store::save`].
    pub fn open_with_config(
        directory: impl Into<PathBuf>,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let directory = directory.into();
        check_directory(&directory)?;

        let file = DatabaseFile::in_dir(&directory).with_options(WriteOptions {
            pretty: config.pretty,
            fsync: config.fsync,
        });
        let initial = file.read()?;
        let found = initial.is_some();
        let history = History::new(initial.unwrap_or_default());

        info!(
            directory = %directory.display(),
            found,
            pois = history.current().pois().len(),
            "Opened store"
        );

        Ok(Self {
            directory,
            file,
            history,
        })
    }

    pub fn current(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Make `snapshot` current. Undone snapshots are discarded.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.history.push(snapshot);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Write the current snapshot to `database.json`, atomically.
    ///
    /// A snapshot that breaks a cross-entity invariant is refused with a
    /// consistency error and nothing is written, so a saved store always
    /// opens again. The history is untouched; saving an undone state is
    /// allowed.
    pub fn save(&self) -> StoreResult<()> {
        self.current()
            .validate()
            .map_err(|e| StoreError::Codec(CodecError::Consistency(e)))?;
        self.file.write(self.current())?;
        info!(
            path = %self.file.path().display(),
            cursor = self.history.cursor(),
            "Saved store"
        );
        Ok(())
    }

    /// Re-read `database.json` and restart the history from it.
    ///
    /// On error the store is left as it was.
    pub fn reload(&mut self) -> StoreResult<()> {
        check_directory(&self.directory)?;
        let snapshot = self.file.read()?.unwrap_or_default();
        self.history.reset_to(snapshot);
        info!(directory = %self.directory.display(), "Reloaded store");
        Ok(())
    }

    /// Where the map file of `floor` lives. Lexical only; the file may not
    /// exist.
    pub fn resolve_floor_map_path(&self, floor: &Floor) -> PathBuf {
        mapnote_util::path::resolve(&self.directory, floor.map_path())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn database_path(&self) -> &Path {
        self.file.path()
    }
}

fn check_directory(directory: &Path) -> StoreResult<()> {
    let metadata = std::fs::metadata(directory).map_err(|e| StoreError::io(directory, e))?;
    if !metadata.is_dir() {
        return Err(StoreError::io(directory, io::Error::other("not a directory")));
    }
    Ok(())
}
