//! Application state and actions.
//!
//! [`App`] owns the store and the per-screen state, and maps every user
//! action onto the store, the authoring draft, or the session. The UI only
//! reads from it.

use std::time::Instant;

use log::error;

use crate::authoring::{QuizDraft, ValidationError};
use crate::media::{self, ImageSlot};
use crate::models::{Quiz, NUM_OPTIONS};
use crate::session::{Session, SessionMode};
use crate::store::QuizStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Authoring,
    Quiz,
    Result,
}

/// Menu selection plus the pending delete confirmation, if any.
pub struct MenuState {
    pub selected: usize,
    pub confirm_delete: Option<String>,
}

/// A row of the menu: a category header or a selectable quiz.
pub enum MenuRow<'a> {
    Category(&'a str),
    Quiz(&'a Quiz),
}

/// Which form field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Title,
    Description,
    Difficulty,
    Category,
    Prompt(usize),
    Option(usize, usize),
}

const HEADER_FIELDS: usize = 4;
const FIELDS_PER_QUESTION: usize = 1 + NUM_OPTIONS;

pub struct FormState {
    pub draft: QuizDraft,
    pub focus: FormFocus,
    pub error: Option<ValidationError>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            draft: QuizDraft::new(),
            focus: FormFocus::Title,
            error: None,
        }
    }

    fn flat_index(&self) -> usize {
        match self.focus {
            FormFocus::Title => 0,
            FormFocus::Description => 1,
            FormFocus::Difficulty => 2,
            FormFocus::Category => 3,
            FormFocus::Prompt(i) => HEADER_FIELDS + i * FIELDS_PER_QUESTION,
            FormFocus::Option(i, j) => HEADER_FIELDS + i * FIELDS_PER_QUESTION + 1 + j,
        }
    }

    fn focus_at(&self, index: usize) -> FormFocus {
        match index {
            0 => FormFocus::Title,
            1 => FormFocus::Description,
            2 => FormFocus::Difficulty,
            3 => FormFocus::Category,
            n => {
                let n = n - HEADER_FIELDS;
                let question = n / FIELDS_PER_QUESTION;
                match n % FIELDS_PER_QUESTION {
                    0 => FormFocus::Prompt(question),
                    j => FormFocus::Option(question, j - 1),
                }
            }
        }
    }

    fn field_count(&self) -> usize {
        HEADER_FIELDS + self.draft.questions.len() * FIELDS_PER_QUESTION
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus_at((self.flat_index() + 1) % self.field_count());
    }

    pub fn focus_previous(&mut self) {
        let count = self.field_count();
        self.focus = self.focus_at((self.flat_index() + count - 1) % count);
    }

    pub fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            FormFocus::Title => &mut self.draft.title,
            FormFocus::Description => &mut self.draft.description,
            FormFocus::Difficulty => &mut self.draft.difficulty,
            FormFocus::Category => &mut self.draft.category,
            FormFocus::Prompt(i) => &mut self.draft.questions[i].prompt,
            FormFocus::Option(i, j) => &mut self.draft.questions[i].options[j],
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    store: QuizStore,
    mode: SessionMode,
    pub screen: Screen,
    pub menu: MenuState,
    pub form: Option<FormState>,
    session: Option<Session>,
    selected_option: usize,
    result_scroll: usize,
    image: ImageSlot,
    /// Status-line message: recoverable warnings and save confirmations.
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: QuizStore, mode: SessionMode) -> Self {
        Self {
            store,
            mode,
            screen: Screen::Menu,
            menu: MenuState {
                selected: 0,
                confirm_delete: None,
            },
            form: None,
            session: None,
            selected_option: 0,
            result_scroll: 0,
            image: ImageSlot::None,
            notice: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &QuizStore {
        &self.store
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn image(&self) -> &ImageSlot {
        &self.image
    }

    // --- Menu ---

    /// Menu rows: quizzes grouped by category, categories in first-seen
    /// order, quizzes in insertion order within each.
    pub fn menu_rows(&self) -> Vec<MenuRow<'_>> {
        let mut categories: Vec<&str> = Vec::new();
        for quiz in self.store.quizzes() {
            let label = quiz.category_label();
            if !categories.contains(&label) {
                categories.push(label);
            }
        }

        let mut rows = Vec::new();
        for category in categories {
            rows.push(MenuRow::Category(category));
            for quiz in self.store.quizzes() {
                if quiz.category_label() == category {
                    rows.push(MenuRow::Quiz(quiz));
                }
            }
        }
        rows
    }

    fn quizzes_in_menu_order(&self) -> Vec<&Quiz> {
        self.menu_rows()
            .into_iter()
            .filter_map(|row| match row {
                MenuRow::Quiz(quiz) => Some(quiz),
                MenuRow::Category(_) => None,
            })
            .collect()
    }

    pub fn selected_quiz(&self) -> Option<&Quiz> {
        self.quizzes_in_menu_order()
            .get(self.menu.selected)
            .copied()
    }

    pub fn menu_down(&mut self) {
        let count = self.quizzes_in_menu_order().len();
        if count > 0 {
            self.menu.selected = (self.menu.selected + 1).min(count - 1);
        }
        self.menu.confirm_delete = None;
        self.notice = None;
    }

    pub fn menu_up(&mut self) {
        self.menu.selected = self.menu.selected.saturating_sub(1);
        self.menu.confirm_delete = None;
        self.notice = None;
    }

    pub fn request_delete(&mut self) {
        let Some(quiz) = self.selected_quiz() else {
            return;
        };
        let title = quiz.title.clone();
        let id = quiz.id.clone();
        self.notice = Some(format!("Delete '{}'? Press y to confirm", title));
        self.menu.confirm_delete = Some(id);
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.menu.confirm_delete.take() else {
            return;
        };
        self.notice = None;
        if let Err(e) = self.store.remove(&id) {
            error!("failed to persist delete: {}", e);
            self.notice = Some(format!("Failed to save quizzes: {}", e));
        }
        let count = self.quizzes_in_menu_order().len();
        self.menu.selected = self.menu.selected.min(count.saturating_sub(1));
    }

    pub fn cancel_delete(&mut self) {
        if self.menu.confirm_delete.take().is_some() {
            self.notice = None;
        }
    }

    pub fn start_selected(&mut self, now: Instant) {
        let Some(quiz) = self.selected_quiz().cloned() else {
            return;
        };
        let session = Session::start(quiz, self.mode, now);
        // A quiz with no questions has nothing to ask.
        self.screen = if session.is_finished() {
            Screen::Result
        } else {
            Screen::Quiz
        };
        self.session = Some(session);
        self.result_scroll = 0;
        self.notice = None;
        self.on_question_entered();
    }

    // --- Authoring ---

    pub fn open_authoring(&mut self) {
        self.form = Some(FormState::new());
        self.screen = Screen::Authoring;
        self.notice = None;
    }

    pub fn cancel_authoring(&mut self) {
        self.form = None;
        self.screen = Screen::Menu;
    }

    pub fn form_add_question(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.draft.add_question();
            form.focus = FormFocus::Prompt(form.draft.questions.len() - 1);
            form.error = None;
        }
    }

    /// Remove the draft question the focus is currently inside.
    pub fn form_remove_question(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let index = match form.focus {
            FormFocus::Prompt(i) | FormFocus::Option(i, _) => i,
            _ => return,
        };
        form.draft.remove_question(index);
        form.focus = if form.draft.questions.is_empty() {
            FormFocus::Title
        } else {
            FormFocus::Prompt(index.min(form.draft.questions.len() - 1))
        };
        form.error = None;
    }

    /// Mark the focused option as the correct answer for its question.
    pub fn form_mark_correct(&mut self) {
        if let Some(form) = self.form.as_mut() {
            if let FormFocus::Option(i, j) = form.focus {
                form.draft.questions[i].correct = j;
            }
        }
    }

    pub fn form_input(&mut self, c: char) {
        if let Some(form) = self.form.as_mut() {
            form.focused_field_mut().push(c);
            form.error = None;
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.focused_field_mut().pop();
            form.error = None;
        }
    }

    /// Validate the draft and persist it. On a validation error the form
    /// stays open with the error displayed; the store is untouched.
    pub fn submit_draft(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.draft.build() {
            Ok(quiz) => {
                let title = quiz.title.clone();
                if let Err(e) = self.store.add(quiz) {
                    error!("failed to persist new quiz: {}", e);
                    self.notice = Some(format!("Failed to save quizzes: {}", e));
                } else {
                    self.notice = Some(format!("Quiz '{}' saved", title));
                }
                self.form = None;
                self.screen = Screen::Menu;
            }
            Err(e) => {
                form.error = Some(e);
            }
        }
    }

    // --- Quiz ---

    pub fn select_next_option(&mut self) {
        self.selected_option = (self.selected_option + 1) % NUM_OPTIONS;
    }

    pub fn select_previous_option(&mut self) {
        self.selected_option = (self.selected_option + NUM_OPTIONS - 1) % NUM_OPTIONS;
    }

    pub fn choose_selected_option(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.select_answer(self.selected_option);
            self.notice = None;
        }
    }

    pub fn next_question(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.next(now) {
            Ok(()) => {
                self.notice = None;
                self.after_index_change();
            }
            Err(e) => {
                // User-correctable: answer first, then advance.
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn previous_question(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.previous(now);
            self.notice = None;
            self.on_question_entered();
        }
    }

    pub fn restart_session(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.restart(now);
            self.screen = Screen::Quiz;
            self.result_scroll = 0;
            self.notice = None;
            self.on_question_entered();
        }
    }

    /// Drop the session and return to the menu.
    pub fn leave_session(&mut self) {
        self.session = None;
        self.image = ImageSlot::None;
        self.screen = Screen::Menu;
        self.notice = None;
    }

    /// Drive the countdown; called on every event-loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if self.screen != Screen::Quiz {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.tick(now) {
            self.after_index_change();
        }
    }

    fn after_index_change(&mut self) {
        if self.session.as_ref().is_some_and(Session::is_finished) {
            self.screen = Screen::Result;
            self.result_scroll = 0;
        } else {
            self.on_question_entered();
        }
    }

    fn on_question_entered(&mut self) {
        self.selected_option = 0;
        self.image = match self.session.as_ref().and_then(Session::current_question) {
            Some(question) => media::resolve(question.image.as_deref()),
            None => ImageSlot::None,
        };
    }

    // --- Results ---

    pub fn scroll_results_down(&mut self) {
        if let Some(session) = self.session.as_ref() {
            let max_scroll = session.total().saturating_sub(1);
            self.result_scroll = (self.result_scroll + 1).min(max_scroll);
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::session::{QUESTION_TIME, TIMEOUT_GRACE};
    use crate::store::QuizStore;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Instant;
    use uuid::Uuid;

    fn temp_app(mode: SessionMode) -> (App, PathBuf) {
        let path = std::env::temp_dir().join(format!("quizmaster-app-{}.json", Uuid::new_v4()));
        let (store, _) = QuizStore::open(&path).unwrap();
        (App::new(store, mode), path)
    }

    fn quiz_in_category(id: &str, category: &str) -> Quiz {
        Quiz {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            difficulty: Difficulty::Easy,
            category: Some(category.to_string()),
            questions: Vec::new(),
        }
    }

    #[test]
    fn test_full_run_through_default_quiz() {
        let (mut app, path) = temp_app(SessionMode::Untimed);
        let now = Instant::now();

        app.start_selected(now);
        assert_eq!(app.screen, Screen::Quiz);

        // Advancing before answering warns instead of moving on.
        app.next_question(now);
        assert!(app.notice.is_some());
        assert_eq!(app.screen, Screen::Quiz);

        // Select "Paris" (index 2) and finish.
        app.select_next_option();
        app.select_next_option();
        app.choose_selected_option();
        app.next_question(now);

        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.session().unwrap().score(), 1);

        app.leave_session();
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session().is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_timed_run_finishes_without_input() {
        let (mut app, path) = temp_app(SessionMode::Timed);
        let t0 = Instant::now();

        app.start_selected(t0);
        app.tick(t0 + QUESTION_TIME);
        assert_eq!(app.screen, Screen::Quiz);

        app.tick(t0 + QUESTION_TIME + TIMEOUT_GRACE);
        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.session().unwrap().score(), 0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_menu_groups_by_category_in_first_seen_order() {
        let (mut app, path) = temp_app(SessionMode::Untimed);

        // The default quiz sits in "General"; interleave a second category.
        app.store.add(quiz_in_category("physics", "Science")).unwrap();
        app.store.add(quiz_in_category("trivia", "General")).unwrap();

        let rows: Vec<String> = app
            .menu_rows()
            .iter()
            .map(|row| match row {
                MenuRow::Category(category) => format!("# {}", category),
                MenuRow::Quiz(quiz) => quiz.id.clone(),
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                "# General",
                "general_knowledge",
                "trivia",
                "# Science",
                "physics",
            ]
        );

        // Selection follows the grouped order, not insertion order.
        app.menu_down();
        assert_eq!(app.selected_quiz().unwrap().id, "trivia");
        app.menu_down();
        assert_eq!(app.selected_quiz().unwrap().id, "physics");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut app, path) = temp_app(SessionMode::Untimed);

        app.request_delete();
        assert!(app.menu.confirm_delete.is_some());
        assert_eq!(app.store().quizzes().len(), 1);

        app.cancel_delete();
        assert_eq!(app.store().quizzes().len(), 1);

        app.request_delete();
        app.confirm_delete();
        assert!(app.store().quizzes().is_empty());
        assert!(app.selected_quiz().is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_validation_leaves_store_untouched() {
        let (mut app, path) = temp_app(SessionMode::Untimed);

        app.open_authoring();
        assert_eq!(app.screen, Screen::Authoring);
        app.submit_draft();

        // Blank title: the form stays open with the error, nothing is added.
        assert_eq!(app.screen, Screen::Authoring);
        assert!(app.form.as_ref().unwrap().error.is_some());
        assert_eq!(app.store().quizzes().len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_authoring_submits_valid_draft() {
        let (mut app, path) = temp_app(SessionMode::Untimed);

        app.open_authoring();
        {
            let form = app.form.as_mut().unwrap();
            form.draft.title = "Maths".to_string();
            form.draft.questions[0].prompt = "2 + 2?".to_string();
            form.draft.questions[0].options = ["3".into(), "4".into(), "5".into(), "6".into()];
            form.draft.questions[0].correct = 1;
        }
        app.submit_draft();

        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.store().quizzes().len(), 2);
        assert_eq!(app.store().quizzes()[1].title, "Maths");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_form_focus_cycles_through_every_field() {
        let mut form = FormState::new();
        let count = HEADER_FIELDS + FIELDS_PER_QUESTION * form.draft.questions.len();

        for _ in 0..count {
            form.focus_next();
        }
        assert_eq!(form.focus, FormFocus::Title);

        form.focus_previous();
        assert_eq!(form.focus, FormFocus::Option(0, 3));
    }

    #[test]
    fn test_form_remove_question_moves_focus() {
        let (mut app, path) = temp_app(SessionMode::Untimed);

        app.open_authoring();
        app.form_add_question();
        assert_eq!(app.form.as_ref().unwrap().focus, FormFocus::Prompt(1));

        app.form_remove_question();
        assert_eq!(app.form.as_ref().unwrap().focus, FormFocus::Prompt(0));

        app.form_remove_question();
        assert_eq!(app.form.as_ref().unwrap().focus, FormFocus::Title);
        assert!(app.form.as_ref().unwrap().draft.questions.is_empty());

        fs::remove_file(&path).unwrap();
    }
}
