use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::media::ImageSlot;
use crate::session::{OptionMarking, Recorded, Session};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_meta(frame, chunks[1], app);
    render_question_text(frame, chunks[2], &question.text);
    render_options(frame, chunks[3], session, &question.options, app.selected_option());
    render_status(frame, chunks[4], app, session);
    render_controls(frame, chunks[5], session);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    if let Some(remaining) = session.countdown_remaining(Instant::now()) {
        let secs = remaining.as_secs();
        let color = if secs <= 5 { Color::Red } else { Color::Blue };
        let widget = Paragraph::new(format!("Time left: {} sec", secs)).fg(color).bold();
        frame.render_widget(widget, halves[0]);
    }

    let progress = format!(
        "{}/{}",
        session.current_index() + 1,
        session.total()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_meta(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some(question) = app.session().and_then(Session::current_question) {
        if let Some(difficulty) = &question.difficulty {
            spans.push(Span::styled(
                format!("Difficulty: {}  ", difficulty),
                Style::default().fg(Color::DarkGray).italic(),
            ));
        }
    }

    match app.image() {
        ImageSlot::None => {}
        ImageSlot::Available(path) => {
            spans.push(Span::styled(
                format!("[image: {}]", path.display()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        ImageSlot::Missing(_) => {
            spans.push(Span::styled(
                "Image not found",
                Style::default().fg(Color::Red),
            ));
        }
    }

    if !spans.is_empty() {
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    options: &[String; 4],
    selected: usize,
) {
    let answered = !session.recorded().is_unanswered();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let (marker, style) = if answered {
            match session.marking(index) {
                OptionMarking::Correct => ("+", Style::default().fg(Color::Green).bold()),
                OptionMarking::IncorrectSelected => ("x", Style::default().fg(Color::Red).bold()),
                OptionMarking::Unselected => (" ", Style::default().fg(Color::DarkGray)),
            }
        } else if index == selected {
            (">", Style::default().fg(Color::Cyan).bold())
        } else {
            (" ", Style::default().fg(Color::Gray))
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, session: &Session) {
    let (text, color) = if session.in_timeout_pause() {
        ("Time's up!".to_string(), Color::Yellow)
    } else if let Some(notice) = &app.notice {
        (notice.clone(), Color::Yellow)
    } else {
        match session.recorded() {
            Recorded::Choice(c) if session.current_question().is_some_and(|q| q.is_correct(c)) => {
                ("Correct!".to_string(), Color::Green)
            }
            Recorded::Choice(_) => ("Wrong!".to_string(), Color::Red),
            _ => return,
        }
    };

    let widget = Paragraph::new(text).alignment(Alignment::Center).fg(color);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &Session) {
    let text = if session.current_index() + 1 == session.total() {
        "j/k navigate  ·  enter answer  ·  n finish  ·  p previous  ·  esc menu"
    } else {
        "j/k navigate  ·  enter answer  ·  n next  ·  p previous  ·  esc menu"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
