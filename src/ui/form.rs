use ratatui::{
    prelude::*,
    widgets::{Block, Padding, Paragraph},
};

use crate::app::{App, FormFocus, FormState};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0]);
    render_fields(frame, chunks[1], form);
    render_error(frame, chunks[2], form);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(Span::styled(
        "CREATE NEW QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { ">" } else { " " };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!(" {} ", marker), style),
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}

fn render_fields(frame: &mut Frame, area: Rect, form: &FormState) {
    let draft = &form.draft;
    let mut lines = vec![
        field_line("Title", &draft.title, form.focus == FormFocus::Title),
        field_line(
            "Description",
            &draft.description,
            form.focus == FormFocus::Description,
        ),
        field_line(
            "Difficulty",
            &draft.difficulty,
            form.focus == FormFocus::Difficulty,
        ),
        field_line("Category", &draft.category, form.focus == FormFocus::Category),
    ];

    let mut focused_line = match form.focus {
        FormFocus::Title => 0,
        FormFocus::Description => 1,
        FormFocus::Difficulty => 2,
        FormFocus::Category => 3,
        _ => 0,
    };

    for (i, question) in draft.questions.iter().enumerate() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Question {}", i + 1),
            Style::default().fg(Color::Cyan),
        )));

        if form.focus == FormFocus::Prompt(i) {
            focused_line = lines.len();
        }
        lines.push(field_line(
            "Prompt",
            &question.prompt,
            form.focus == FormFocus::Prompt(i),
        ));

        for (j, option) in question.options.iter().enumerate() {
            if form.focus == FormFocus::Option(i, j) {
                focused_line = lines.len();
            }
            let correct_marker = if question.correct == j { "(*)" } else { "( )" };
            let focused = form.focus == FormFocus::Option(i, j);
            let style = if focused {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if focused { ">" } else { " " };
            let cursor = if focused { "_" } else { "" };

            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(
                    format!("{} {}. ", correct_marker, OPTION_LABELS[j]),
                    if question.correct == j {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                ),
                Span::styled(format!("{}{}", option, cursor), style),
            ]));
        }
    }

    // Keep the focused field in view.
    let visible = area.height.saturating_sub(1) as usize;
    let scroll = focused_line.saturating_sub(visible);

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_error(frame: &mut Frame, area: Rect, form: &FormState) {
    if let Some(error) = &form.error {
        let widget = Paragraph::new(error.to_string())
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "tab next field  ·  enter mark correct  ·  ^n add question  ·  ^d remove  ·  ^s save  ·  esc cancel",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
