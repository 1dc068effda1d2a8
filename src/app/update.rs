use crate::app::model::{Focus, Model, ToastLevel};
use crate::editor::{Direction, EditKind, NoteBuffer};
use crate::session::Mode;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Browser
    /// Highlight the previous row
    BrowseUp,
    /// Highlight the next row
    BrowseDown,
    BrowseTop,
    BrowseBottom,
    /// Highlight a row by index (mouse)
    BrowseClick(usize),
    /// Scroll the browser list without moving the highlight
    BrowseScrollUp,
    BrowseScrollDown,
    /// Open the highlighted directory
    BrowseEnter,
    /// Go to the parent directory
    BrowseParent,

    // Focus
    /// Switch focus between browser and note pane
    SwitchFocus,
    /// Focus a specific pane (mouse)
    FocusPane(Focus),

    // Note view
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Mode
    ToggleMode,
    EnterEditMode,
    ExitEditMode,

    // Editor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorPaste(String),
    EditorDeleteBack,
    EditorDeleteForward,
    EditorSplitLine,
    EditorMoveCursor(Direction),
    EditorMoveHome,
    EditorMoveEnd,
    EditorMoveWordLeft,
    EditorMoveWordRight,
    EditorMoveToStart,
    EditorMoveToEnd,
    /// Move cursor to absolute position (line, byte col), e.g. from a click
    EditorMoveTo(usize, usize),
    EditorPageUp,
    EditorPageDown,
    EditorScrollUp(usize),
    EditorScrollDown(usize),

    // History
    Undo,
    Redo,

    // Links and clipboard
    /// Open visible-link picker (or follow directly when single link)
    OpenVisibleLinks,
    /// Follow numbered link in the picker
    SelectVisibleLink(u8),
    CancelVisibleLinkPicker,
    /// Follow the link at a cell of the note text area (row, col)
    FollowLinkAt(usize, usize),
    /// Update hovered link target (or clear when none)
    HoverLink(Option<String>),
    /// Copy the selected asset's identifier
    CopyId,

    // Files
    ToggleWatch,
    /// The note file changed on disk
    NoteChanged,
    /// Re-read the note file
    ForceReload,

    // Help
    ToggleHelp,
    HideHelp,
    HelpScrollUp,
    HelpScrollDown,

    // Window
    Resize(u16, u16),

    Quit,
}

impl Message {
    /// Undo grouping for messages that change the note text.
    pub fn edit_kind(&self) -> Option<EditKind> {
        match self {
            Self::EditorInsertChar(ch) => Some(EditKind::for_char(*ch)),
            Self::EditorSplitLine => Some(EditKind::Break),
            Self::EditorDeleteBack | Self::EditorDeleteForward => Some(EditKind::Delete),
            Self::EditorPaste(_) => Some(EditKind::Replace),
            _ => None,
        }
    }

    /// Whether the message moves the browser highlight.
    pub const fn moves_browser_selection(&self) -> bool {
        matches!(
            self,
            Self::BrowseUp | Self::BrowseDown | Self::BrowseTop | Self::BrowseBottom | Self::BrowseClick(_)
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Disk access (loading notes, saving edits) happens afterwards in the
/// side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Browser
        Message::BrowseUp => {
            if let Some(sel) = model.browse_selected {
                model.browse_selected = Some(sel.saturating_sub(1));
                model.ensure_browse_selection_visible();
            }
        }
        Message::BrowseDown => {
            if let Some(sel) = model.browse_selected {
                let max = model.browse_entries.len().saturating_sub(1);
                model.browse_selected = Some((sel + 1).min(max));
                model.ensure_browse_selection_visible();
            }
        }
        Message::BrowseTop => {
            if !model.browse_entries.is_empty() {
                model.browse_selected = Some(0);
                model.ensure_browse_selection_visible();
            }
        }
        Message::BrowseBottom => {
            if !model.browse_entries.is_empty() {
                model.browse_selected = Some(model.browse_entries.len() - 1);
                model.ensure_browse_selection_visible();
            }
        }
        Message::BrowseClick(idx) => {
            if idx < model.browse_entries.len() {
                model.browse_selected = Some(idx);
                model.focus = Focus::Browser;
            }
        }
        Message::BrowseScrollUp => {
            model.browse_scroll_offset = model.browse_scroll_offset.saturating_sub(1);
        }
        Message::BrowseScrollDown => {
            model.browse_scroll_offset =
                (model.browse_scroll_offset + 1).min(model.max_browse_scroll_offset());
        }

        // Focus
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Browser => Focus::Note,
                Focus::Note => Focus::Browser,
            };
        }
        Message::FocusPane(focus) => {
            model.focus = focus;
        }

        // Note view
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        // Mode
        Message::ToggleMode => {
            model = match model.session.mode() {
                Mode::View => enter_edit_mode(model),
                Mode::Edit => exit_edit_mode(model),
            };
        }
        Message::EnterEditMode => model = enter_edit_mode(model),
        Message::ExitEditMode => model = exit_edit_mode(model),

        // Editor: buffer changes here, persisted in side effects
        Message::EditorInsertChar(ch) => edit(&mut model, |b| b.insert_char(ch)),
        Message::EditorPaste(text) => edit(&mut model, |b| b.insert_str(&text)),
        Message::EditorDeleteBack => edit(&mut model, |b| {
            b.delete_back();
        }),
        Message::EditorDeleteForward => edit(&mut model, |b| {
            b.delete_forward();
        }),
        Message::EditorSplitLine => edit(&mut model, NoteBuffer::split_line),
        Message::EditorMoveCursor(dir) => edit(&mut model, |b| b.move_cursor(dir)),
        Message::EditorMoveHome => edit(&mut model, NoteBuffer::move_home),
        Message::EditorMoveEnd => edit(&mut model, NoteBuffer::move_end),
        Message::EditorMoveWordLeft => edit(&mut model, NoteBuffer::move_word_left),
        Message::EditorMoveWordRight => edit(&mut model, NoteBuffer::move_word_right),
        Message::EditorMoveToStart => edit(&mut model, NoteBuffer::move_to_start),
        Message::EditorMoveToEnd => edit(&mut model, NoteBuffer::move_to_end),
        Message::EditorMoveTo(line, col) => {
            model.focus = Focus::Note;
            edit(&mut model, |b| b.move_to(line, col));
        }
        Message::EditorPageUp => {
            let step = usize::from(model.editor_viewport.height().saturating_sub(1)).max(1);
            edit(&mut model, |b| {
                for _ in 0..step {
                    b.move_cursor(Direction::Up);
                }
            });
        }
        Message::EditorPageDown => {
            let step = usize::from(model.editor_viewport.height().saturating_sub(1)).max(1);
            edit(&mut model, |b| {
                for _ in 0..step {
                    b.move_cursor(Direction::Down);
                }
            });
        }
        Message::EditorScrollUp(n) => model.editor_viewport.scroll_up(n),
        Message::EditorScrollDown(n) => model.editor_viewport.scroll_down(n),

        // Links
        Message::CancelVisibleLinkPicker => model.link_picker_items.clear(),
        Message::HoverLink(target) => model.hovered_link = target,

        // Files
        Message::ToggleWatch => model.watch_enabled = !model.watch_enabled,

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => model.help_visible = false,
        Message::HelpScrollUp => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(1);
        }
        Message::HelpScrollDown => model.help_scroll_offset += 1,

        // Window
        Message::Resize(width, height) => model.resize(width, height),

        Message::Quit => model.should_quit = true,

        // Handled in side effects
        Message::BrowseEnter
        | Message::BrowseParent
        | Message::Undo
        | Message::Redo
        | Message::OpenVisibleLinks
        | Message::SelectVisibleLink(_)
        | Message::FollowLinkAt(..)
        | Message::CopyId
        | Message::NoteChanged
        | Message::ForceReload => {}
    }

    model
}

/// Apply a buffer operation and keep the cursor on screen.
fn edit(model: &mut Model, op: impl FnOnce(&mut NoteBuffer)) {
    let Some(buffer) = model.editor.as_mut() else {
        return;
    };
    op(buffer);
    let lines = buffer.line_count();
    model.editor_viewport.set_total_lines(lines);
    model.ensure_cursor_visible();
}

fn enter_edit_mode(mut model: Model) -> Model {
    if model.session.current_id().is_none() {
        model.show_toast(ToastLevel::Warning, "Select an asset before editing");
        return model;
    }
    if model.session.is_locked() {
        model.show_toast(
            ToastLevel::Warning,
            "Note could not be read; editing is disabled",
        );
        return model;
    }
    if model.session.mode() == Mode::Edit && model.editor.is_some() {
        model.focus = Focus::Note;
        return model;
    }
    model.session.set_mode(Mode::Edit);
    model.refresh_editor();
    model.relayout_note();
    model.editor_viewport.go_to_top();
    model.focus = Focus::Note;
    model.link_picker_items.clear();
    model.hovered_link = None;
    model
}

fn exit_edit_mode(mut model: Model) -> Model {
    model.session.set_mode(Mode::View);
    model.refresh_editor();
    model.relayout_note();
    model
}
