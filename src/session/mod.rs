//! The note state machine behind the note pane.
//!
//! A [`NoteSession`] tracks which asset is selected, the note text for it,
//! the undo history and the display mode. Every text change is persisted
//! straight away through the [`NoteStore`]; switching to another asset
//! reloads the text and clears the history.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::AssetId;
use crate::editor::EditKind;
use crate::history::UndoHistory;
use crate::store::{NoteStore, SaveOutcome, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no asset selected")]
    NoSelection,
    #[error("note for {0} could not be loaded; editing is disabled")]
    Locked(AssetId),
}

/// How the note pane presents the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Read-only rendering with clickable links.
    #[default]
    View,
    /// Text editing.
    Edit,
}

impl Mode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::View => Self::Edit,
            Self::Edit => Self::View,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
        }
    }
}

#[derive(Debug, Clone)]
struct Selected {
    id: AssetId,
    path: PathBuf,
    text: String,
    /// Set when the note file exists but could not be read.
    locked: bool,
}

#[derive(Debug)]
pub struct NoteSession {
    store: NoteStore,
    history: UndoHistory,
    selected: Option<Selected>,
    mode: Mode,
    last_edit: Option<EditKind>,
}

impl NoteSession {
    pub fn new(store: NoteStore, history_limit: usize) -> Self {
        Self {
            store,
            history: UndoHistory::new(history_limit),
            selected: None,
            mode: Mode::View,
            last_edit: None,
        }
    }

    pub const fn store(&self) -> &NoteStore {
        &self.store
    }

    pub const fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub const fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn current_id(&self) -> Option<&AssetId> {
        self.selected.as_ref().map(|s| &s.id)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.selected.as_ref().map(|s| s.path.as_path())
    }

    /// Current note text; empty when nothing is selected.
    pub fn text(&self) -> &str {
        self.selected.as_ref().map_or("", |s| s.text.as_str())
    }

    pub fn is_locked(&self) -> bool {
        self.selected.as_ref().is_some_and(|s| s.locked)
    }

    /// Whether the selected asset has a note file on disk.
    pub fn has_note(&self) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| self.store.exists(&s.id))
    }

    /// Backing file of the selected asset's note.
    pub fn note_path(&self) -> Option<PathBuf> {
        self.selected.as_ref().map(|s| self.store.path_for(&s.id))
    }

    /// Select an asset and load its note.
    ///
    /// Re-selecting the asset that is already current keeps the text and
    /// history. Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the note exists but cannot be
    /// read. The asset stays selected with editing disabled.
    pub fn select(&mut self, path: &Path, id: AssetId) -> Result<bool, SessionError> {
        if let Some(current) = self.selected.as_mut()
            && current.id == id
        {
            current.path = path.to_path_buf();
            return Ok(false);
        }

        self.history.clear();
        self.last_edit = None;
        tracing::debug!(id = %id, path = %path.display(), "selection changed");

        match self.store.load(&id) {
            Ok(text) => {
                self.selected = Some(Selected {
                    id,
                    path: path.to_path_buf(),
                    text,
                    locked: false,
                });
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "note unreadable");
                self.selected = Some(Selected {
                    id,
                    path: path.to_path_buf(),
                    text: String::new(),
                    locked: true,
                });
                Err(err.into())
            }
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.history.clear();
        self.last_edit = None;
    }

    /// Replace the note text and persist it.
    ///
    /// Consecutive edits of the same kind share one undo step. Returns
    /// `None` when the text did not change.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected, the note is locked, or the store
    /// cannot write.
    pub fn set_text(
        &mut self,
        text: &str,
        kind: EditKind,
    ) -> Result<Option<SaveOutcome>, SessionError> {
        let selected = Self::editable(&mut self.selected)?;
        if selected.text == text {
            return Ok(None);
        }
        let previous = std::mem::replace(&mut selected.text, text.to_string());
        if self.last_edit != Some(kind) || kind == EditKind::Replace {
            self.history.record(&previous);
        }
        self.last_edit = Some(kind);
        self.persist().map(Some)
    }

    /// Restore the previous snapshot and persist it.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected, the note is locked, or the store
    /// cannot write.
    pub fn undo(&mut self) -> Result<Option<SaveOutcome>, SessionError> {
        let selected = Self::editable(&mut self.selected)?;
        let Some(restored) = self.history.undo(&selected.text) else {
            return Ok(None);
        };
        selected.text = restored;
        self.last_edit = None;
        tracing::debug!(remaining = self.history.undo_len(), "undo");
        self.persist().map(Some)
    }

    /// Re-apply the most recently undone snapshot and persist it.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected, the note is locked, or the store
    /// cannot write.
    pub fn redo(&mut self) -> Result<Option<SaveOutcome>, SessionError> {
        let selected = Self::editable(&mut self.selected)?;
        let Some(restored) = self.history.redo(&selected.text) else {
            return Ok(None);
        };
        selected.text = restored;
        self.last_edit = None;
        tracing::debug!(remaining = self.history.redo_len(), "redo");
        self.persist().map(Some)
    }

    /// Re-read the selected note after an external change.
    ///
    /// Returns whether the text changed. A locked note that reads cleanly
    /// again is unlocked.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected or the note cannot be read.
    pub fn reload_from_disk(&mut self) -> Result<bool, SessionError> {
        let selected = self.selected.as_mut().ok_or(SessionError::NoSelection)?;
        let text = self.store.load(&selected.id)?;
        selected.locked = false;
        // A blank note has no file, so reading it back yields "".
        if text == selected.text || (text.is_empty() && selected.text.trim().is_empty()) {
            return Ok(false);
        }
        selected.text = text;
        self.last_edit = None;
        Ok(true)
    }

    fn editable(selected: &mut Option<Selected>) -> Result<&mut Selected, SessionError> {
        let selected = selected.as_mut().ok_or(SessionError::NoSelection)?;
        if selected.locked {
            return Err(SessionError::Locked(selected.id.clone()));
        }
        Ok(selected)
    }

    fn persist(&self) -> Result<SaveOutcome, SessionError> {
        let selected = self.selected.as_ref().ok_or(SessionError::NoSelection)?;
        Ok(self.store.save_or_delete(&selected.id, &selected.text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn id(raw: &str) -> AssetId {
        AssetId::parse(raw).unwrap()
    }

    fn session(dir: &Path) -> NoteSession {
        NoteSession::new(NoteStore::new(dir.join("Notes")), 10)
    }

    fn type_text(session: &mut NoteSession, typed: &str) {
        let mut text = session.text().to_string();
        for ch in typed.chars() {
            text.push(ch);
            session.set_text(&text, EditKind::for_char(ch)).unwrap();
        }
    }

    #[test]
    fn test_select_loads_existing_note() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.store().save_or_delete(&id("hero"), "rig is v2").unwrap();

        assert!(s.select(Path::new("hero.fbx"), id("hero")).unwrap());
        assert_eq!(s.text(), "rig is v2");
        assert!(s.has_note());
        assert_eq!(s.current_path(), Some(Path::new("hero.fbx")));
    }

    #[test]
    fn test_reselecting_same_asset_keeps_history() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("x", EditKind::Insert).unwrap();
        assert!(!s.select(Path::new("a"), id("a")).unwrap());
        assert!(s.history().can_undo());
    }

    #[test]
    fn test_selection_change_clears_history() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("note a", EditKind::Replace).unwrap();
        s.select(Path::new("b"), id("b")).unwrap();
        assert!(!s.history().can_undo());
        assert_eq!(s.text(), "");
        assert_eq!(s.undo().unwrap(), None);
    }

    #[test]
    fn test_edits_persist_immediately_and_blank_deletes() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();

        let outcome = s.set_text("hello", EditKind::Replace).unwrap();
        assert_eq!(outcome, Some(SaveOutcome::Written));
        assert_eq!(s.store().load(&id("a")).unwrap(), "hello");

        let outcome = s.set_text("   ", EditKind::Delete).unwrap();
        assert_eq!(outcome, Some(SaveOutcome::Deleted));
        assert!(!s.has_note());
    }

    #[test]
    fn test_unchanged_text_is_not_saved() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        assert_eq!(s.set_text("", EditKind::Insert).unwrap(), None);
        assert!(!s.history().can_undo());
    }

    #[test]
    fn test_typing_a_word_is_one_undo_step() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        type_text(&mut s, "fix uvs");
        // "fix" / " " / "uvs"
        assert_eq!(s.history().undo_len(), 3);

        s.undo().unwrap();
        assert_eq!(s.text(), "fix ");
        s.undo().unwrap();
        assert_eq!(s.text(), "fix");
        s.undo().unwrap();
        assert_eq!(s.text(), "");
        assert!(!s.has_note());
    }

    #[test]
    fn test_undo_and_redo_persist_restored_text() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("one", EditKind::Replace).unwrap();
        s.set_text("two", EditKind::Replace).unwrap();

        assert_eq!(s.undo().unwrap(), Some(SaveOutcome::Written));
        assert_eq!(s.store().load(&id("a")).unwrap(), "one");
        assert_eq!(s.redo().unwrap(), Some(SaveOutcome::Written));
        assert_eq!(s.store().load(&id("a")).unwrap(), "two");
        assert_eq!(s.redo().unwrap(), None);
    }

    #[test]
    fn test_new_edit_after_undo_drops_redo() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("one", EditKind::Replace).unwrap();
        s.undo().unwrap();
        assert!(s.history().can_redo());
        s.set_text("other", EditKind::Insert).unwrap();
        assert!(!s.history().can_redo());
    }

    #[test]
    fn test_unreadable_note_locks_editing() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        std::fs::create_dir_all(dir.path().join("Notes")).unwrap();
        std::fs::write(s.store().path_for(&id("bad")), [0xff, 0xfe]).unwrap();

        assert!(s.select(Path::new("bad"), id("bad")).is_err());
        assert!(s.is_locked());
        assert!(matches!(
            s.set_text("x", EditKind::Insert),
            Err(SessionError::Locked(_))
        ));
        // the unreadable file is left alone
        assert_eq!(
            std::fs::read(s.store().path_for(&id("bad"))).unwrap(),
            vec![0xff, 0xfe]
        );

        std::fs::write(s.store().path_for(&id("bad")), "fixed").unwrap();
        assert!(s.reload_from_disk().unwrap());
        assert!(!s.is_locked());
        assert_eq!(s.text(), "fixed");
    }

    #[test]
    fn test_edit_without_selection_fails() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        assert!(matches!(
            s.set_text("x", EditKind::Insert),
            Err(SessionError::NoSelection)
        ));
        assert!(matches!(s.undo(), Err(SessionError::NoSelection)));
    }

    #[test]
    fn test_reload_picks_up_external_change() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("mine", EditKind::Replace).unwrap();
        std::fs::write(s.store().path_for(&id("a")), "theirs").unwrap();
        assert!(s.reload_from_disk().unwrap());
        assert_eq!(s.text(), "theirs");
        assert!(!s.reload_from_disk().unwrap());
    }

    #[test]
    fn test_reload_keeps_blank_note_that_has_no_file() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("x", EditKind::Insert).unwrap();
        s.set_text("  ", EditKind::Replace).unwrap();
        assert!(!s.has_note());
        assert!(!s.reload_from_disk().unwrap());
        assert_eq!(s.text(), "  ");
    }

    #[test]
    fn test_mode_toggles_and_survives_selection() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        assert_eq!(s.mode(), Mode::View);
        assert_eq!(s.toggle_mode(), Mode::Edit);
        s.select(Path::new("a"), id("a")).unwrap();
        assert_eq!(s.mode(), Mode::Edit);
        assert_eq!(s.toggle_mode(), Mode::View);
    }

    #[test]
    fn test_deselect_clears_text_and_history() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        s.select(Path::new("a"), id("a")).unwrap();
        s.set_text("x", EditKind::Insert).unwrap();
        s.deselect();
        assert_eq!(s.text(), "");
        assert!(s.current_id().is_none());
        assert!(!s.history().can_undo());
    }
}
