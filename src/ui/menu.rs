use ratatui::{
    prelude::*,
    widgets::{Block, Padding, Paragraph},
};

use crate::app::{App, MenuRow};
use crate::session::SessionMode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_quiz_list(frame, chunks[1], app);
    render_notice(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let subtitle = match app.mode() {
        SessionMode::Timed => "Select a quiz to begin · timed mode",
        SessionMode::Untimed => "Select a quiz to begin",
    };
    let content = vec![
        Line::from(Span::styled(
            "QUIZMASTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(subtitle.fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_quiz_list(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.menu_rows();
    if rows.is_empty() {
        let widget = Paragraph::new("No quizzes yet · press c to create one")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    let mut quiz_row = 0;

    for row in &rows {
        match row {
            MenuRow::Category(category) => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    *category,
                    Style::default().fg(Color::Cyan).bold(),
                )));
            }
            MenuRow::Quiz(quiz) => {
                let is_selected = quiz_row == app.menu.selected;
                if is_selected {
                    selected_line = lines.len();
                }
                let style = if is_selected {
                    Style::default().fg(Color::White).bold()
                } else {
                    Style::default().fg(Color::Gray)
                };
                let marker = if is_selected { ">" } else { " " };

                let mut spans = vec![
                    Span::styled(format!(" {} ", marker), style),
                    Span::styled(quiz.title.as_str(), style),
                ];
                if !quiz.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", quiz.description),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                spans.push(Span::styled(
                    format!("  [{}]", quiz.difficulty),
                    Style::default().fg(Color::DarkGray),
                ));
                lines.push(Line::from(spans));
                quiz_row += 1;
            }
        }
    }

    // Keep the selected row in view.
    let visible = area.height.saturating_sub(1) as usize;
    let scroll = selected_line.saturating_sub(visible);

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = &app.notice {
        let widget = Paragraph::new(notice.as_str())
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter start  ·  c create  ·  d delete  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
