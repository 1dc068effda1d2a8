use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Focus, Message, Model};
use crate::editor::Direction;
use crate::session::Mode;
use crate::ui::layout::byte_col_at;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if Self::editing(model) => Some(Message::EditorPaste(text.clone())),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    /// Whether keys go to the edit buffer.
    fn editing(model: &Model) -> bool {
        model.focus == Focus::Note && model.session.mode() == Mode::Edit && model.editor.is_some()
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::HideHelp),
            };
        }

        if model.link_picker_active() {
            return match key.code {
                KeyCode::Char(c) if ('1'..='9').contains(&c) => {
                    Some(Message::SelectVisibleLink((c as u8) - b'0'))
                }
                _ => Some(Message::CancelVisibleLinkPicker),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return Some(Message::Quit);
        }

        if Self::editing(model) {
            return Self::handle_editor_key(key);
        }

        // Keys shared by both panes
        match key.code {
            KeyCode::Char('y') => return Some(Message::CopyId),
            KeyCode::Char('e') => return Some(Message::EnterEditMode),
            KeyCode::Char('v') => return Some(Message::ToggleMode),
            KeyCode::Char('u') => return Some(Message::Undo),
            KeyCode::Char('r') if ctrl => return Some(Message::Redo),
            KeyCode::Char('r') => return Some(Message::ForceReload),
            KeyCode::Char('w') => return Some(Message::ToggleWatch),
            KeyCode::Char('o') => return Some(Message::OpenVisibleLinks),
            KeyCode::Char('?') | KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('q') => return Some(Message::Quit),
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            _ => {}
        }

        match model.focus {
            Focus::Browser => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::BrowseDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::BrowseUp),
                KeyCode::Char('g') | KeyCode::Home => Some(Message::BrowseTop),
                KeyCode::Char('G') | KeyCode::End => Some(Message::BrowseBottom),
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Message::BrowseEnter),
                KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                    Some(Message::BrowseParent)
                }
                _ => None,
            },
            Focus::Note => match key.code {
                KeyCode::Char('j') | KeyCode::Down => model
                    .viewport
                    .can_scroll_down()
                    .then_some(Message::ScrollDown(1)),
                KeyCode::Char('k') | KeyCode::Up => {
                    model.viewport.can_scroll_up().then_some(Message::ScrollUp(1))
                }
                KeyCode::Char(' ') | KeyCode::PageDown => {
                    model.viewport.can_scroll_down().then_some(Message::PageDown)
                }
                KeyCode::Char('b') | KeyCode::PageUp => {
                    model.viewport.can_scroll_up().then_some(Message::PageUp)
                }
                KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
                KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
                KeyCode::Esc => Some(Message::FocusPane(Focus::Browser)),
                _ => None,
            },
        }
    }

    fn handle_editor_key(key: KeyEvent) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => Some(Message::ExitEditMode),
            KeyCode::Char('z') if ctrl => Some(Message::Undo),
            KeyCode::Char('y') if ctrl => Some(Message::Redo),
            KeyCode::Left if ctrl => Some(Message::EditorMoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::EditorMoveWordRight),
            KeyCode::Home if ctrl => Some(Message::EditorMoveToStart),
            KeyCode::End if ctrl => Some(Message::EditorMoveToEnd),
            KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::EditorMoveHome),
            KeyCode::End => Some(Message::EditorMoveEnd),
            KeyCode::PageUp => Some(Message::EditorPageUp),
            KeyCode::PageDown => Some(Message::EditorPageDown),
            KeyCode::Enter => Some(Message::EditorSplitLine),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::SwitchFocus),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::EditorInsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match mouse.kind {
                MouseEventKind::ScrollDown => Some(Message::HelpScrollDown),
                MouseEventKind::ScrollUp => Some(Message::HelpScrollUp),
                MouseEventKind::Up(MouseButton::Left) => Some(Message::HideHelp),
                _ => None,
            };
        }

        let screen = model.screen_area();
        if model.link_picker_active() {
            return Self::handle_link_picker_mouse(mouse, model, screen);
        }

        let browser = crate::ui::browser_inner_area(screen);
        if point_in_rect(mouse.column, mouse.row, browser) {
            return match mouse.kind {
                MouseEventKind::Up(MouseButton::Left) => {
                    let start = model
                        .browse_scroll_offset
                        .min(model.max_browse_scroll_offset());
                    let idx = start + (mouse.row - browser.y) as usize;
                    (idx < model.browse_entries.len()).then_some(Message::BrowseClick(idx))
                }
                MouseEventKind::ScrollDown => Some(Message::BrowseScrollDown),
                MouseEventKind::ScrollUp => Some(Message::BrowseScrollUp),
                MouseEventKind::Moved => model.hovered_link.is_some().then_some(Message::HoverLink(None)),
                _ => None,
            };
        }

        let note = crate::ui::note_inner_area(screen);
        if point_in_rect(mouse.column, mouse.row, note) {
            let rel_row = (mouse.row - note.y) as usize;
            let rel_col = (mouse.column - note.x) as usize;
            if model.session.mode() == Mode::Edit
                && let Some(buffer) = &model.editor
            {
                return match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        let (gutter, h_offset) = crate::ui::editor_columns(buffer, note.width);
                        let line = (model.editor_viewport.offset() + rel_row)
                            .min(buffer.line_count().saturating_sub(1));
                        let display_col = rel_col.saturating_sub(gutter as usize) + h_offset;
                        let text = buffer.line_at(line).unwrap_or_default();
                        Some(Message::EditorMoveTo(line, byte_col_at(&text, display_col)))
                    }
                    MouseEventKind::ScrollDown => Some(Message::EditorScrollDown(3)),
                    MouseEventKind::ScrollUp => Some(Message::EditorScrollUp(3)),
                    _ => None,
                };
            }
            return match mouse.kind {
                MouseEventKind::Up(MouseButton::Left) => {
                    if model.link_at_cell(rel_row, rel_col).is_some() {
                        Some(Message::FollowLinkAt(rel_row, rel_col))
                    } else {
                        (model.focus != Focus::Note).then_some(Message::FocusPane(Focus::Note))
                    }
                }
                MouseEventKind::Moved => {
                    let hovered = model
                        .link_at_cell(rel_row, rel_col)
                        .map(|link| link.target.label());
                    (hovered != model.hovered_link).then_some(Message::HoverLink(hovered))
                }
                MouseEventKind::ScrollDown => model
                    .viewport
                    .can_scroll_down()
                    .then_some(Message::ScrollDown(3)),
                MouseEventKind::ScrollUp => {
                    model.viewport.can_scroll_up().then_some(Message::ScrollUp(3))
                }
                _ => None,
            };
        }

        if matches!(mouse.kind, MouseEventKind::Moved) && model.hovered_link.is_some() {
            return Some(Message::HoverLink(None));
        }
        None
    }

    fn handle_link_picker_mouse(mouse: MouseEvent, model: &Model, screen: Rect) -> Option<Message> {
        if !matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
            return None;
        }
        let popup = crate::ui::link_picker_rect(screen, model.link_picker_items.len());
        if point_in_rect(mouse.column, mouse.row, popup) {
            let content_top = crate::ui::link_picker_content_top(popup);
            if mouse.row >= content_top {
                let idx = ((mouse.row - content_top) / 2) as usize;
                if idx < model.link_picker_items.len()
                    && let Ok(number) = u8::try_from(idx + 1)
                {
                    return Some(Message::SelectVisibleLink(number));
                }
            }
        }
        Some(Message::CancelVisibleLinkPicker)
    }
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
