use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::links::LinkTarget;

pub fn link_picker_rect(area: Rect, items_len: usize) -> Rect {
    let popup_width = area.width.saturating_sub(16).max(44);
    // Link picker has at most nine items
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = (items_len as u16 * 2) + 4;
    let popup_height = needed_rows.min(area.height.saturating_sub(4).max(8));
    centered_popup_rect(popup_width, popup_height, area)
}

pub const fn link_picker_content_top(popup: Rect) -> u16 {
    // 1 row for border + 1 row for padding
    popup.y + 2
}

pub fn render_link_picker_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let items = &model.link_picker_items;
    if items.is_empty() {
        return;
    }
    let popup = link_picker_rect(area, items.len());

    let mut lines: Vec<Line> = Vec::new();
    for (idx, link) in items.iter().enumerate() {
        let action = match &link.target {
            LinkTarget::Url(_) => "open externally",
            LinkTarget::Asset(_) => "select asset",
        };
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                format!("{}: ", idx + 1),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(link.target.label(), Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled(
                format!("line {}, {action}", link.line + 1),
                Style::default().fg(Color::Indexed(245)),
            ),
        ]));
    }
    lines.push(Line::raw(" "));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(
            "1-9 open · any key or click outside cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ]));

    let block = Block::default()
        .title("Open Link")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    vec![
        Line::styled("Browser", section_style),
        Line::raw("  j/k or Up/Down      Select asset (loads its note)"),
        Line::raw("  Enter / l           Open directory"),
        Line::raw("  h / Backspace       Parent directory"),
        Line::raw("  g / G               First / last entry"),
        Line::raw("  Tab                 Focus note pane"),
        Line::raw(""),
        Line::styled("Note (view)", section_style),
        Line::raw("  j/k, Space/b        Scroll"),
        Line::raw("  o                   Open visible links (1-9)"),
        Line::raw("  Click               Follow link"),
        Line::raw("  e / v               Edit note"),
        Line::raw("  u / Ctrl-r          Undo / redo"),
        Line::raw("  Tab / Esc           Back to browser"),
        Line::raw(""),
        Line::styled("Note (edit)", section_style),
        Line::raw("  Typing              Saved as you type"),
        Line::raw("  Esc                 Return to view mode"),
        Line::raw("  Ctrl-z / Ctrl-y     Undo / redo"),
        Line::raw("  Arrows, Home/End    Navigate"),
        Line::raw("  Ctrl+Left/Right     Word movement"),
        Line::raw("  Ctrl+Home/End       Note start / end"),
        Line::raw("  Ctrl-q              Quit"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  y                   Copy asset identifier"),
        Line::raw("  v                   Toggle view / edit"),
        Line::raw("  w                   Toggle watch"),
        Line::raw("  r                   Reload note"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw(""),
        Line::styled("Notes", section_style),
        Line::raw(format!("  Directory: {}", model.project.notes_dir().display())),
        Line::raw(format!(
            "  Undo steps kept: {}",
            model.session.history().limit()
        )),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ]
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);
    let dim_style = Style::default().fg(Color::Indexed(245));
    let all_lines = help_lines(model);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);
    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} any other key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
