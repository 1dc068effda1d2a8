use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Focus, Model};
use crate::editor::NoteBuffer;
use crate::session::Mode;

use super::layout::{NoteRow, printable_line};
use super::{BROWSER_WIDTH_PERCENT, FOOTER_ROWS, NOTE_WIDTH_PERCENT, overlays, status};

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(BROWSER_WIDTH_PERCENT),
            Constraint::Percentage(NOTE_WIDTH_PERCENT),
        ])
        .split(area)
}

const fn body_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

/// Rows available to the asset list inside its border.
pub fn browser_inner_area(area: Rect) -> Rect {
    Block::default()
        .borders(Borders::ALL)
        .inner(split_main_columns(body_area(area))[0])
}

/// Text area of the note pane inside its border.
pub fn note_inner_area(area: Rect) -> Rect {
    Block::default()
        .borders(Borders::ALL)
        .inner(split_main_columns(body_area(area))[1])
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let columns = split_main_columns(body_area(area));
    render_browser(model, frame, columns[0]);
    render_note(model, frame, columns[1]);

    let message_area = Rect {
        y: area.y + area.height.saturating_sub(FOOTER_ROWS),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, message_area);
    } else if model.hovered_link.is_some() {
        status::render_hover_link_bar(model, frame, message_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.link_picker_active() {
        overlays::render_link_picker_overlay(model, frame, area);
    }
}

fn render_browser(model: &Model, frame: &mut Frame, area: Rect) {
    let entries = &model.browse_entries;
    let visible_rows = area.height.saturating_sub(2) as usize;
    let max_start = entries.len().saturating_sub(visible_rows);
    let start = model.browse_scroll_offset.min(max_start);

    let items: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, entry)| {
            let selected = model.browse_selected == Some(i);
            let marker = if selected { ">" } else { " " };
            let noted = if model.browse_noted.get(i).copied().unwrap_or(false) {
                "*"
            } else {
                " "
            };
            let display_name = if entry.is_dir && !entry.is_parent {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = if entry.is_dir {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let style = if selected { style.reversed() } else { style };
            Line::styled(format!("{marker}{noted}{display_name}"), style)
        })
        .collect();

    let title = model
        .project
        .relative(&model.browse_dir)
        .ok()
        .filter(|rel| !rel.is_empty())
        .or_else(|| {
            model
                .project
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| model.browse_dir.display().to_string());

    let block = pane_block(title, model.focus == Focus::Browser);
    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn render_note(model: &Model, frame: &mut Frame, area: Rect) {
    let title = model
        .session
        .current_path()
        .and_then(|p| p.file_name())
        .map_or_else(|| "Note".to_string(), |n| n.to_string_lossy().into_owned());
    let block = pane_block(title, model.focus == Focus::Note);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(Color::Indexed(245));
    if model.session.current_id().is_none() {
        let prompt = Paragraph::new(Line::styled(
            "Select an asset in the browser to attach a note.",
            dim,
        ));
        frame.render_widget(prompt, inner);
        return;
    }
    if model.session.is_locked() {
        let warning = Paragraph::new(Line::styled(
            "This note could not be read. Editing is disabled until it loads (r reloads).",
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(warning, inner);
        return;
    }

    match (model.session.mode(), model.editor.as_ref()) {
        (Mode::Edit, Some(buffer)) => render_editor(model, buffer, frame, inner),
        _ => render_view(model, frame, inner),
    }
}

fn render_view(model: &Model, frame: &mut Frame, area: Rect) {
    if model.note_rows.is_empty() {
        let hint = Paragraph::new(Line::styled(
            "(empty note, press e to write one)",
            Style::default().fg(Color::Indexed(245)),
        ));
        frame.render_widget(hint, area);
        return;
    }

    let range = model.viewport.visible_range();
    let content: Vec<Line> = model
        .note_rows
        .get(range)
        .unwrap_or_default()
        .iter()
        .map(|row| styled_row(model, row))
        .collect();
    frame.render_widget(Paragraph::new(content), area);
}

/// Split a row into spans, underlining the chars that belong to links.
fn styled_row(model: &Model, row: &NoteRow) -> Line<'static> {
    let link_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_is_link = false;

    for (idx, ch) in row.text.chars().enumerate() {
        let col = row.start_col + idx;
        let is_link = model.links.iter().any(|link| link.contains(row.line, col));
        if is_link != current_is_link && !current.is_empty() {
            let text = std::mem::take(&mut current);
            spans.push(if current_is_link {
                Span::styled(text, link_style)
            } else {
                Span::raw(text)
            });
        }
        current_is_link = is_link;
        current.push(ch);
    }
    if !current.is_empty() {
        spans.push(if current_is_link {
            Span::styled(current, link_style)
        } else {
            Span::raw(current)
        });
    }
    Line::from(spans)
}

/// Gutter width (line number plus a space) and horizontal scroll of the
/// editor for a text area `area_width` columns wide.
///
/// Every line shifts left once the cursor runs past the right edge.
pub fn editor_columns(buffer: &NoteBuffer, area_width: u16) -> (u16, usize) {
    let gutter = line_number_width(buffer.line_count()) + 1;
    let text_width = (area_width.saturating_sub(gutter) as usize).max(1);
    let cursor = buffer.cursor();
    let cursor_x = buffer
        .line_at(cursor.line)
        .map_or(0, |line| {
            line.get(..cursor.col)
                .map_or(0, |s| printable_line(s).width())
        });
    (gutter, (cursor_x + 1).saturating_sub(text_width))
}

fn render_editor(model: &Model, buffer: &NoteBuffer, frame: &mut Frame, area: Rect) {
    let total_lines = buffer.line_count();
    let gutter_width = line_number_width(total_lines);
    let cursor = buffer.cursor();
    let (_, h_offset) = editor_columns(buffer, area.width);

    let range = model.editor_viewport.visible_range();
    let end = range.end.min(total_lines);
    let mut content: Vec<Line> = Vec::new();
    for line_idx in range.start..end {
        let line_text = printable_line(&buffer.line_at(line_idx).unwrap_or_default());
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if line_idx == cursor.line {
            let col = if line_text.is_char_boundary(cursor.col) {
                cursor.col
            } else {
                line_text.len()
            };
            let (before, rest) = line_text.split_at(col);
            let mut rest_chars = rest.chars();
            let cursor_char = rest_chars
                .next()
                .map_or_else(|| " ".to_string(), |c| c.to_string());
            let after = rest_chars.as_str();

            let before = skip_columns(before, h_offset);
            if !before.is_empty() {
                spans.push(Span::raw(before.to_string()));
            }
            spans.push(Span::styled(
                cursor_char,
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after.to_string()));
            }
        } else {
            spans.push(Span::raw(skip_columns(&line_text, h_offset).to_string()));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content), area);
}

/// Drop the first `columns` display columns of `s`.
fn skip_columns(s: &str, columns: usize) -> &str {
    if columns == 0 {
        return s;
    }
    let mut x = 0;
    for (idx, ch) in s.char_indices() {
        if x >= columns {
            return &s[idx..];
        }
        x += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
    }
    ""
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
