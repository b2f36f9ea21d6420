//! # quizmaster
//!
//! A terminal quiz application: play multiple-choice quizzes from a JSON
//! document, author new ones through a form, and optionally race a
//! per-question countdown.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizmaster::{QuizMaster, SessionMode};
//!
//! fn main() -> Result<(), quizmaster::QuizError> {
//!     // Open the quiz store (defaults are created if the file is missing)
//!     let quiz = QuizMaster::open("quizzes.json", SessionMode::Untimed)?;
//!
//!     // Run the app in the terminal
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
mod authoring;
mod media;
mod models;
mod session;
mod store;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;

pub use app::{App, FormFocus, FormState, MenuRow, MenuState, Screen};
pub use authoring::{QuestionDraft, QuizDraft, ValidationError};
pub use media::ImageSlot;
pub use models::{Difficulty, Question, Quiz, NUM_OPTIONS};
pub use session::{
    AnswerReview, OptionMarking, Recorded, Session, SessionError, SessionMode, QUESTION_TIME,
    TIMEOUT_GRACE,
};
pub use store::{DefaultReason, LoadOutcome, QuizCollection, QuizStore, StoreError};

/// How often the event loop wakes up to drive the countdown.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for application-level operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error from the quiz store.
    Store(StoreError),
    /// IO error during execution.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Store(e) => write!(f, "Quiz store error: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Store(e) => Some(e),
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        QuizError::Store(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// The application, ready to run in the terminal.
pub struct QuizMaster {
    app: App,
}

impl QuizMaster {
    /// Open the quiz store at `path` and build the application.
    ///
    /// A missing or malformed store never fails here; the default collection
    /// is substituted and persisted (see [`QuizStore::open`]).
    pub fn open<P: AsRef<Path>>(path: P, mode: SessionMode) -> Result<Self, QuizError> {
        let (store, outcome) = QuizStore::open(path)?;
        if let LoadOutcome::Defaulted(reason) = &outcome {
            info!("quiz store initialized with defaults ({})", reason);
        }
        Ok(Self {
            app: App::new(store, mode),
        })
    }

    /// Run the app in the terminal.
    ///
    /// This takes over the terminal, displays the UI, and returns when the
    /// user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(app, key) {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.screen {
        Screen::Menu => handle_menu_input(app, key.code),
        Screen::Authoring => handle_form_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key.code),
        Screen::Result => handle_result_input(app, key.code),
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode) -> bool {
    if app.menu.confirm_delete.is_some() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            _ => app.cancel_delete(),
        }
        return false;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.menu_up(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_down(),
        KeyCode::Enter => app.start_selected(Instant::now()),
        KeyCode::Char('c') | KeyCode::Char('C') => app.open_authoring(),
        KeyCode::Char('d') | KeyCode::Char('D') => app.request_delete(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_form_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => app.form_add_question(),
            KeyCode::Char('d') => app.form_remove_question(),
            KeyCode::Char('s') => app.submit_draft(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => app.cancel_authoring(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus_previous();
            }
        }
        KeyCode::Enter => {
            // On an option row, enter marks it as the correct answer;
            // elsewhere it just moves on.
            let on_option = app
                .form
                .as_ref()
                .is_some_and(|form| matches!(form.focus, FormFocus::Option(_, _)));
            if on_option {
                app.form_mark_correct();
            } else if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        KeyCode::Char(c) => app.form_input(c),
        KeyCode::Backspace => app.form_backspace(),
        _ => {}
    }
    false
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_selected_option(),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.next_question(Instant::now())
        }
        KeyCode::Left | KeyCode::Char('p') | KeyCode::Char('P') => {
            app.previous_question(Instant::now())
        }
        KeyCode::Esc => app.leave_session(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart_session(Instant::now()),
        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => app.leave_session(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
