//! Identifier-keyed note files.
//!
//! Each asset with a note has exactly one `<id>.txt` file in the notes
//! directory. The file is created on the first non-empty save and removed
//! once the note becomes blank.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::AssetId;

pub const NOTE_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read note {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write note {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to delete note {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create notes directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a save did on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The note text was written.
    Written,
    /// The note was blank and its file was removed.
    Deleted,
    /// The note was blank and had no file.
    Unchanged,
}

/// Note files stored in a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backing file for an asset's note.
    pub fn path_for(&self, id: &AssetId) -> PathBuf {
        self.dir.join(format!("{id}.{NOTE_EXTENSION}"))
    }

    pub fn exists(&self, id: &AssetId) -> bool {
        self.path_for(id).is_file()
    }

    /// Load an asset's note; a missing file is an empty note.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the file exists but cannot be read
    /// as UTF-8 text.
    pub fn load(&self, id: &AssetId) -> Result<String, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&path).map_err(|source| StoreError::Read { path, source })
    }

    /// Persist a note, or delete it when the text is blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the notes directory cannot be created or the
    /// note file cannot be written or removed.
    pub fn save_or_delete(&self, id: &AssetId, text: &str) -> Result<SaveOutcome, StoreError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path_for(id);
        if text.trim().is_empty() {
            if path.exists() {
                fs::remove_file(&path).map_err(|source| StoreError::Delete {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(id = %id, "deleted blank note");
                return Ok(SaveOutcome::Deleted);
            }
            return Ok(SaveOutcome::Unchanged);
        }

        fs::write(&path, text).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(id = %id, bytes = text.len(), "wrote note");
        Ok(SaveOutcome::Written)
    }

    /// Identifiers that currently have a note file, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the directory listing fails.
    pub fn list(&self) -> Result<Vec<AssetId>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let read_err = |source| StoreError::Read {
            path: self.dir.clone(),
            source,
        };
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != NOTE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = AssetId::parse(stem) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn id(raw: &str) -> AssetId {
        AssetId::parse(raw).unwrap()
    }

    #[test]
    fn test_missing_note_loads_empty() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("Notes"));
        assert_eq!(store.load(&id("abc")).unwrap(), "");
        assert!(!store.exists(&id("abc")));
    }

    #[test]
    fn test_first_non_empty_save_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("Notes"));
        let outcome = store.save_or_delete(&id("abc"), "check import scale").unwrap();
        assert_eq!(outcome, SaveOutcome::Written);
        assert!(store.dir().is_dir());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Notes/abc.txt")).unwrap(),
            "check import scale"
        );
    }

    #[test]
    fn test_blank_save_deletes_existing_file() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.save_or_delete(&id("abc"), "text").unwrap();
        let outcome = store.save_or_delete(&id("abc"), "  \n\t ").unwrap();
        assert_eq!(outcome, SaveOutcome::Deleted);
        assert!(!store.path_for(&id("abc")).exists());
    }

    #[test]
    fn test_blank_save_without_file_is_unchanged() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        assert_eq!(
            store.save_or_delete(&id("abc"), "").unwrap(),
            SaveOutcome::Unchanged
        );
        assert!(!store.path_for(&id("abc")).exists());
    }

    #[test]
    fn test_text_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        let text = "  leading space\ntrailing newline\n";
        store.save_or_delete(&id("abc"), text).unwrap();
        assert_eq!(store.load(&id("abc")).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        std::fs::write(store.path_for(&id("abc")), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.load(&id("abc")),
            Err(StoreError::Read { .. })
        ));
    }

    #[test]
    fn test_list_returns_sorted_note_ids_only() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.save_or_delete(&id("zz"), "z").unwrap();
        store.save_or_delete(&id("aa"), "a").unwrap();
        std::fs::write(dir.path().join("README.md"), "x").unwrap();
        std::fs::write(dir.path().join("bad name.txt"), "x").unwrap();
        assert_eq!(store.list().unwrap(), vec![id("aa"), id("zz")]);
    }

    #[test]
    fn test_list_on_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("none"));
        assert!(store.list().unwrap().is_empty());
    }
}
