use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;

use crate::asset::{AssetEntry, Project, list_directory};
use crate::editor::{EditKind, NoteBuffer};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::links::{LinkRef, extract_links, link_at};
use crate::session::{Mode, NoteSession};
use crate::store::NoteStore;
use crate::ui::layout::{NoteRow, wrap_note};
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Browser,
    Note,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Project whose assets are browsed
    pub project: Project,
    /// Selection, note text, history and mode
    pub session: NoteSession,
    /// Directory listed in the browser
    pub browse_dir: PathBuf,
    /// Rows of the browser
    pub browse_entries: Vec<AssetEntry>,
    /// Whether each browser row's asset has a note file
    pub browse_noted: Vec<bool>,
    /// Highlighted browser row
    pub browse_selected: Option<usize>,
    /// First browser row on screen
    pub browse_scroll_offset: usize,
    pub focus: Focus,
    /// Note text wrapped to the note pane width (view mode)
    pub note_rows: Vec<NoteRow>,
    /// Links in the current note
    pub links: Vec<LinkRef>,
    /// Scroll over `note_rows`
    pub viewport: Viewport,
    /// Edit buffer, present while editing an editable note
    pub editor: Option<NoteBuffer>,
    /// Scroll over editor lines
    pub editor_viewport: Viewport,
    /// Pending visible-link picker items for quick follow (`o`)
    pub link_picker_items: Vec<LinkRef>,
    /// Target of the link under the mouse
    pub hovered_link: Option<String>,
    pub help_visible: bool,
    pub help_scroll_offset: usize,
    /// Whether the current note file is watched for external changes
    pub watch_enabled: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
    terminal_size: (u16, u16),
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("browse_dir", &self.browse_dir)
            .field("selected", &self.session.current_id())
            .field("mode", &self.session.mode())
            .field("focus", &self.focus)
            .field("watch_enabled", &self.watch_enabled)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(project: Project, session: NoteSession, terminal_size: (u16, u16)) -> Self {
        let note_area = note_area_for(terminal_size);
        Self {
            browse_dir: project.asset_root().to_path_buf(),
            project,
            session,
            browse_entries: Vec::new(),
            browse_noted: Vec::new(),
            browse_selected: None,
            browse_scroll_offset: 0,
            focus: Focus::Browser,
            note_rows: Vec::new(),
            links: Vec::new(),
            viewport: Viewport::new(note_area.width, note_area.height, 0),
            editor: None,
            editor_viewport: Viewport::new(note_area.width, note_area.height, 0),
            link_picker_items: Vec::new(),
            hovered_link: None,
            help_visible: false,
            help_scroll_offset: 0,
            watch_enabled: false,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            terminal_size,
            toast: None,
        }
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Whole-screen area the layout is computed from.
    pub const fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.terminal_size.0, self.terminal_size.1)
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let note_area = note_area_for(self.terminal_size);
        self.viewport.resize(note_area.width, note_area.height);
        self.editor_viewport
            .resize(note_area.width, note_area.height);
        self.browse_scroll_offset = self
            .browse_scroll_offset
            .min(self.max_browse_scroll_offset());
        self.relayout_note();
        self.ensure_cursor_visible();
    }

    /// Rebuild wrapped rows and links from the session text.
    pub(super) fn relayout_note(&mut self) {
        let text = self.session.text();
        self.note_rows = wrap_note(text, self.viewport.width());
        self.links = extract_links(text);
        self.viewport.set_total_lines(self.note_rows.len());
        let editor_lines = self.editor.as_ref().map_or(0, NoteBuffer::line_count);
        self.editor_viewport.set_total_lines(editor_lines);
    }

    pub(super) fn browser_visible_rows(&self) -> usize {
        crate::ui::browser_inner_area(self.screen_area()).height as usize
    }

    pub(super) fn max_browse_scroll_offset(&self) -> usize {
        self.browse_entries
            .len()
            .saturating_sub(self.browser_visible_rows())
    }

    /// Scroll the browser so the highlighted row is on screen.
    pub(super) fn ensure_browse_selection_visible(&mut self) {
        let Some(sel) = self.browse_selected else {
            return;
        };
        let visible = self.browser_visible_rows().max(1);
        if sel < self.browse_scroll_offset {
            self.browse_scroll_offset = sel;
        } else if sel >= self.browse_scroll_offset + visible {
            self.browse_scroll_offset = sel + 1 - visible;
        }
    }

    pub fn highlighted_entry(&self) -> Option<&AssetEntry> {
        self.browse_selected
            .and_then(|idx| self.browse_entries.get(idx))
    }

    /// List `dir` in the browser and highlight its first asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn load_directory(&mut self, dir: &Path) -> Result<()> {
        let entries = list_directory(&self.project, dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        self.browse_dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        self.browse_noted = entries
            .iter()
            .map(|entry| self.entry_has_note(entry))
            .collect();
        self.browse_selected = entries
            .iter()
            .position(AssetEntry::is_asset)
            .or(if entries.is_empty() { None } else { Some(0) });
        self.browse_entries = entries;
        self.browse_scroll_offset = 0;
        self.ensure_browse_selection_visible();
        Ok(())
    }

    fn entry_has_note(&self, entry: &AssetEntry) -> bool {
        entry.is_asset()
            && self
                .project
                .identify(&entry.path)
                .is_ok_and(|id| self.session.store().exists(&id))
    }

    /// Refresh the note marker of the highlighted row after a save.
    pub(super) fn refresh_note_marker(&mut self) {
        let Some(idx) = self.browse_selected else {
            return;
        };
        let Some(entry) = self.browse_entries.get(idx) else {
            return;
        };
        let noted = self.entry_has_note(entry);
        if let Some(slot) = self.browse_noted.get_mut(idx) {
            *slot = noted;
        }
    }

    /// Load the note of the highlighted browser row into the session.
    ///
    /// The ".." row and an empty listing clear the selection.
    pub fn select_highlighted(&mut self) {
        let Some(entry) = self.highlighted_entry().cloned() else {
            self.session.deselect();
            self.after_selection_change();
            return;
        };
        if !entry.is_asset() {
            self.session.deselect();
            self.after_selection_change();
            return;
        }
        let id = match self.project.identify(&entry.path) {
            Ok(id) => id,
            Err(err) => {
                self.session.deselect();
                self.after_selection_change();
                self.show_toast(ToastLevel::Error, format!("Cannot identify asset: {err}"));
                return;
            }
        };
        match self.session.select(&entry.path, id) {
            Ok(true) => self.after_selection_change(),
            Ok(false) => {}
            Err(err) => {
                self.after_selection_change();
                self.show_toast(ToastLevel::Error, format!("Note unavailable: {err}"));
            }
        }
    }

    fn after_selection_change(&mut self) {
        self.link_picker_items.clear();
        self.hovered_link = None;
        self.refresh_editor();
        self.relayout_note();
        self.viewport.go_to_top();
        self.editor_viewport.go_to_top();
    }

    /// Show `path` in the browser and select it.
    ///
    /// # Errors
    ///
    /// Returns an error if the containing directory cannot be listed.
    pub fn reveal_path(&mut self, path: &Path) -> Result<()> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let dir = path
            .parent()
            .filter(|p| p.starts_with(self.project.root()))
            .map_or_else(|| self.project.asset_root().to_path_buf(), Path::to_path_buf);
        self.load_directory(&dir)?;
        if let Some(idx) = self
            .browse_entries
            .iter()
            .position(|e| !e.is_parent && e.path == path)
        {
            self.browse_selected = Some(idx);
            self.ensure_browse_selection_visible();
        }
        self.select_highlighted();
        Ok(())
    }

    /// Create or drop the edit buffer to match the mode and selection.
    pub(super) fn refresh_editor(&mut self) {
        let editable = self.session.current_id().is_some() && !self.session.is_locked();
        if self.session.mode() == Mode::Edit && editable {
            self.editor = Some(NoteBuffer::from_text(self.session.text()));
        } else {
            self.editor = None;
        }
    }

    /// Replace the edit buffer's text with the session text, keeping the
    /// cursor near where it was.
    pub(super) fn sync_editor_from_session(&mut self) {
        let text = self.session.text().to_string();
        if let Some(editor) = self.editor.as_mut() {
            editor.replace_text(&text);
        }
        self.relayout_note();
        self.ensure_cursor_visible();
    }

    /// Persist the edit buffer through the session.
    pub(super) fn commit_edit(&mut self, kind: EditKind) {
        let Some(text) = self.editor.as_ref().map(NoteBuffer::text) else {
            return;
        };
        match self.session.set_text(&text, kind) {
            Ok(Some(_)) => self.refresh_note_marker(),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "saving note failed");
                self.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            }
        }
        self.relayout_note();
    }

    pub(super) fn ensure_cursor_visible(&mut self) {
        if let Some(editor) = &self.editor {
            self.editor_viewport.ensure_visible(editor.cursor().line);
        }
    }

    /// Links with at least one char on a visible row.
    pub fn visible_links(&self) -> Vec<LinkRef> {
        let range = self.viewport.visible_range();
        let rows = self.note_rows.get(range).unwrap_or_default();
        self.links
            .iter()
            .filter(|link| {
                rows.iter().any(|row| {
                    let row_end = row.start_col + row.text.chars().count();
                    row.line == link.line && link.start_col < row_end && link.end_col > row.start_col
                })
            })
            .cloned()
            .collect()
    }

    /// The link under a position in the note pane, relative to its text area.
    pub fn link_at_cell(&self, rel_row: usize, rel_col: usize) -> Option<&LinkRef> {
        let row = self.note_rows.get(self.viewport.offset() + rel_row)?;
        let col = row.col_at(rel_col)?;
        link_at(&self.links, row.line, col)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub const fn link_picker_active(&self) -> bool {
        !self.link_picker_items.is_empty()
    }
}

fn note_area_for(terminal_size: (u16, u16)) -> Rect {
    crate::ui::note_inner_area(Rect::new(0, 0, terminal_size.0, terminal_size.1))
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(
            Project::default(),
            NoteSession::new(NoteStore::new(PathBuf::new()), DEFAULT_HISTORY_LIMIT),
            (80, 24),
        )
    }
}
