use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::session::Mode;

pub fn render_hover_link_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(target) = model.hovered_link.as_deref() else {
        return;
    };
    let bar = Paragraph::new(format!("link: {target}"))
        .style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let mode = model.session.mode();
    let mode_style = match mode {
        Mode::View => Style::default().bg(Color::Blue).fg(Color::White),
        Mode::Edit => Style::default().bg(Color::Magenta).fg(Color::White),
    }
    .add_modifier(Modifier::BOLD);

    let asset = model.session.current_path().map_or_else(
        || "no asset".to_string(),
        |path| {
            model
                .project
                .relative(path)
                .unwrap_or_else(|_| path.display().to_string())
        },
    );
    let id = model
        .session
        .current_id()
        .map_or_else(String::new, |id| format!("  id:{id}"));

    let history = model.session.history();
    let mut details = format!("  undo {} redo {}", history.undo_len(), history.redo_len());
    if mode == Mode::Edit
        && let Some(buffer) = &model.editor
    {
        let c = buffer.cursor();
        details.push_str(&format!("  Ln {}, Col {}", c.line + 1, c.col + 1));
        // Blank notes have no file on disk
        if buffer.is_blank() {
            details.push_str(" [no file]");
        }
    } else if model.viewport.total_lines() > 0 {
        details.push_str(&format!("  [{}%]", model.viewport.scroll_percent()));
    }
    if model.session.is_locked() {
        details.push_str(" [locked]");
    }
    if model.watch_enabled {
        details.push_str(" [watching]");
    }

    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let line = Line::from(vec![
        Span::styled(format!(" {} ", mode.label()), mode_style),
        Span::styled(format!(" {asset}{id}{details}  ?:help"), bar_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(bar_style), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
