use std::io::{Write, stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;

use crate::app::{App, Focus, Message, Model, ToastLevel};
use crate::links::LinkTarget;
use crate::session::SessionError;
use crate::watcher::FileWatcher;

impl App {
    /// Watch a note file. The notes directory is created first so there is
    /// something to watch before the first note is written.
    pub(super) fn make_file_watcher(path: &Path) -> Result<FileWatcher> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        FileWatcher::new(path, Duration::from_millis(200))
            .with_context(|| format!("Failed to watch {}", path.display()))
    }

    /// Point the watcher at the selected note, or drop it.
    pub(super) fn sync_watcher(model: &mut Model, file_watcher: &mut Option<FileWatcher>) {
        if !model.watch_enabled {
            *file_watcher = None;
            return;
        }
        let Some(path) = model.session.note_path() else {
            *file_watcher = None;
            return;
        };
        if file_watcher.as_ref().is_some_and(|w| w.is_watching(&path)) {
            return;
        }
        match Self::make_file_watcher(&path) {
            Ok(watcher) => *file_watcher = Some(watcher),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "watcher unavailable");
                model.watch_enabled = false;
                *file_watcher = None;
                model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err:#}"));
            }
        }
    }

    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        file_watcher: &mut Option<FileWatcher>,
        msg: &Message,
    ) {
        if let Some(kind) = msg.edit_kind() {
            model.commit_edit(kind);
            return;
        }
        if msg.moves_browser_selection() {
            model.select_highlighted();
            return;
        }

        match msg {
            Message::BrowseEnter => Self::browse_enter(model),
            Message::BrowseParent => Self::browse_parent(model),
            Message::Undo => Self::apply_history(model, true),
            Message::Redo => Self::apply_history(model, false),
            Message::OpenVisibleLinks => Self::open_visible_links(model),
            Message::SelectVisibleLink(index) => Self::follow_link_picker_index(model, *index),
            Message::FollowLinkAt(row, col) => {
                if let Some(link) = model.link_at_cell(*row, *col).cloned() {
                    model.link_picker_items.clear();
                    Self::follow_link(model, &link.target);
                }
            }
            Message::CopyId => Self::copy_identifier(model),
            Message::ToggleWatch => {
                if model.watch_enabled {
                    Self::sync_watcher(model, file_watcher);
                    if model.watch_enabled {
                        model.show_toast(ToastLevel::Info, "Watching note changes");
                    }
                } else {
                    *file_watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            Message::NoteChanged | Message::ForceReload => {
                Self::reload_note(model, matches!(msg, Message::ForceReload));
            }
            _ => {}
        }
    }

    fn browse_enter(model: &mut Model) {
        let Some(entry) = model.highlighted_entry().cloned() else {
            return;
        };
        if !entry.is_dir {
            model.focus = Focus::Note;
            return;
        }
        let came_from = model.browse_dir.clone();
        if let Err(err) = model.load_directory(&entry.path) {
            model.show_toast(ToastLevel::Error, format!("Browse failed: {err:#}"));
            return;
        }
        if entry.is_parent
            && let Some(idx) = model
                .browse_entries
                .iter()
                .position(|e| !e.is_parent && e.path == came_from)
        {
            model.browse_selected = Some(idx);
            model.ensure_browse_selection_visible();
        }
        model.select_highlighted();
    }

    fn browse_parent(model: &mut Model) {
        let Some(parent) = model
            .browse_entries
            .iter()
            .find(|e| e.is_parent)
            .map(|e| e.path.clone())
        else {
            // Already at the top of the asset tree.
            return;
        };
        let came_from = model.browse_dir.clone();
        if let Err(err) = model.load_directory(&parent) {
            model.show_toast(ToastLevel::Error, format!("Browse failed: {err:#}"));
            return;
        }
        if let Some(idx) = model
            .browse_entries
            .iter()
            .position(|e| !e.is_parent && e.path == came_from)
        {
            model.browse_selected = Some(idx);
            model.ensure_browse_selection_visible();
        }
        model.select_highlighted();
    }

    fn apply_history(model: &mut Model, undo: bool) {
        let result = if undo {
            model.session.undo()
        } else {
            model.session.redo()
        };
        match result {
            Ok(Some(_)) => {
                model.sync_editor_from_session();
                model.refresh_note_marker();
            }
            Ok(None) => {
                let message = if undo {
                    "Nothing to undo"
                } else {
                    "Nothing to redo"
                };
                model.show_toast(ToastLevel::Info, message);
            }
            Err(SessionError::NoSelection) => {
                model.show_toast(ToastLevel::Warning, "No asset selected");
            }
            Err(err) => {
                tracing::warn!(error = %err, undo, "history step failed");
                model.show_toast(ToastLevel::Error, format!("{err}"));
            }
        }
    }

    fn reload_note(model: &mut Model, forced: bool) {
        match model.session.reload_from_disk() {
            Ok(changed) => {
                if model.editor.is_none() {
                    model.refresh_editor();
                }
                if changed {
                    model.sync_editor_from_session();
                    model.refresh_note_marker();
                    model.show_toast(ToastLevel::Info, "Note reloaded from disk");
                } else {
                    model.relayout_note();
                    if forced {
                        model.show_toast(ToastLevel::Info, "Reloaded");
                    }
                }
            }
            Err(SessionError::NoSelection) => {
                if forced {
                    model.show_toast(ToastLevel::Warning, "No asset selected");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "reload failed");
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
            }
        }
    }

    fn open_visible_links(model: &mut Model) {
        let mut visible = model.visible_links();
        visible.truncate(9);

        match visible.len() {
            0 => model.show_toast(ToastLevel::Info, "No visible links"),
            1 => Self::follow_link(model, &visible[0].target),
            _ => {
                model.link_picker_items = visible;
                model.show_toast(ToastLevel::Info, "Select link: 1-9 (Esc to cancel)");
            }
        }
    }

    fn follow_link_picker_index(model: &mut Model, index: u8) {
        if index == 0 {
            return;
        }
        let idx = (index - 1) as usize;
        let Some(link) = model.link_picker_items.get(idx) else {
            return;
        };
        let target = link.target.clone();
        model.link_picker_items.clear();
        Self::follow_link(model, &target);
    }

    fn follow_link(model: &mut Model, target: &LinkTarget) {
        match target {
            LinkTarget::Url(url) => {
                tracing::info!(url = %url, "opening link");
                match open_external_link(url) {
                    Ok(()) => model.show_toast(ToastLevel::Info, format!("Opened {url}")),
                    Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
                }
            }
            LinkTarget::Asset(relative) => {
                let path = match model.project.resolve(relative) {
                    Ok(path) => path,
                    Err(err) => {
                        model.show_toast(ToastLevel::Warning, format!("{err}"));
                        return;
                    }
                };
                tracing::info!(asset = %relative, "following asset link");
                match model.reveal_path(&path) {
                    Ok(()) => {
                        model.focus = Focus::Browser;
                        model.show_toast(ToastLevel::Info, format!("Selected {relative}"));
                    }
                    Err(err) => {
                        model.show_toast(ToastLevel::Error, format!("Browse failed: {err:#}"));
                    }
                }
            }
        }
    }

    fn copy_identifier(model: &mut Model) {
        let Some(id) = model.session.current_id().cloned() else {
            model.show_toast(ToastLevel::Warning, "No asset selected");
            return;
        };
        match copy_to_clipboard(id.as_str()) {
            Ok(()) => model.show_toast(ToastLevel::Info, format!("Copied identifier {id}")),
            Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
        }
    }
}

fn open_external_link(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

/// OSC 52 escape that asks the terminal to put `text` on the clipboard.
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
