//! The quiz session state machine.
//!
//! A [`Session`] is a transient value created when a quiz is selected and
//! dropped when the user leaves it. It tracks the current question index,
//! the per-question recorded answer, and the running score. In timed mode it
//! also owns a cancellable countdown: every entry into a still-unanswered
//! question arms a fresh 15 second deadline, an explicit answer cancels it,
//! and expiry records a timeout and auto-advances after a short grace pause.
//!
//! All transitions that arm the countdown take an explicit `now` so tests
//! can drive time without sleeping.

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;

use crate::models::{Question, Quiz, NUM_OPTIONS};

/// Countdown per question in timed mode.
pub const QUESTION_TIME: Duration = Duration::from_secs(15);

/// Pause between countdown expiry and the auto-advance, so the user sees the
/// "time's up" state before the next question appears.
pub const TIMEOUT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Untimed,
    Timed,
}

/// What has been recorded for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Unanswered,
    Choice(usize),
    /// The countdown expired before an answer was recorded.
    TimedOut,
}

impl Recorded {
    pub fn is_unanswered(&self) -> bool {
        matches!(self, Recorded::Unanswered)
    }

    pub fn choice(&self) -> Option<usize> {
        match self {
            Recorded::Choice(c) => Some(*c),
            _ => None,
        }
    }
}

/// Error type for session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `next()` was requested before the current question was answered.
    NoAnswerYet,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoAnswerYet => write!(f, "Select an answer first"),
        }
    }
}

impl std::error::Error for SessionError {}

/// How an option should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMarking {
    Unselected,
    Correct,
    IncorrectSelected,
}

/// Per-question data for the review screen.
#[derive(Debug, Clone)]
pub struct AnswerReview {
    pub prompt: String,
    /// The option the user picked, if any.
    pub selected: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Counting { deadline: Instant },
    Grace { deadline: Instant },
}

pub struct Session {
    quiz: Quiz,
    current: usize,
    answers: Vec<Recorded>,
    score: usize,
    mode: SessionMode,
    timer: TimerState,
}

impl Session {
    pub fn start(quiz: Quiz, mode: SessionMode, now: Instant) -> Self {
        let answers = vec![Recorded::Unanswered; quiz.questions.len()];
        let mut session = Self {
            quiz,
            current: 0,
            answers,
            score: 0,
            mode,
            timer: TimerState::Idle,
        };
        session.enter_current(now);
        session
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// 0-based index of the current question; equals `total()` once finished.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.total()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// What is recorded for the current question.
    pub fn recorded(&self) -> Recorded {
        self.answers
            .get(self.current)
            .copied()
            .unwrap_or(Recorded::Unanswered)
    }

    /// Record `choice` for the current question. First answer wins: once a
    /// question holds an answer (or a timeout), later calls are no-ops. The
    /// score is incremented here, at first-answer time, and never recomputed.
    pub fn select_answer(&mut self, choice: usize) {
        if self.is_finished() || choice >= NUM_OPTIONS {
            return;
        }
        if !self.answers[self.current].is_unanswered() {
            return;
        }

        self.answers[self.current] = Recorded::Choice(choice);
        if self.quiz.questions[self.current].is_correct(choice) {
            self.score += 1;
        }
        // Answering cancels the countdown for this question.
        self.timer = TimerState::Idle;
        debug!(
            "question {} answered with option {} (score {})",
            self.current + 1,
            choice,
            self.score
        );
    }

    /// Advance to the next question, or to the finished state after the last
    /// one. Fails while the current question is unanswered.
    pub fn next(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.is_finished() {
            return Ok(());
        }
        if self.answers[self.current].is_unanswered() {
            return Err(SessionError::NoAnswerYet);
        }
        self.advance(now);
        Ok(())
    }

    /// Step back one question. Recorded answers and the score are untouched.
    /// No-op at the first question and once finished.
    pub fn previous(&mut self, now: Instant) {
        if self.current == 0 || self.is_finished() {
            return;
        }
        self.current -= 1;
        self.enter_current(now);
    }

    /// Reset to a fresh run of the same quiz.
    pub fn restart(&mut self, now: Instant) {
        self.current = 0;
        self.score = 0;
        self.answers = vec![Recorded::Unanswered; self.quiz.questions.len()];
        self.enter_current(now);
    }

    /// Drive the countdown. Returns true if the session state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.timer {
            TimerState::Counting { deadline } if now >= deadline => {
                if self.answers[self.current].is_unanswered() {
                    self.answers[self.current] = Recorded::TimedOut;
                    debug!("question {} timed out", self.current + 1);
                }
                self.timer = TimerState::Grace {
                    deadline: now + TIMEOUT_GRACE,
                };
                true
            }
            TimerState::Grace { deadline } if now >= deadline => {
                self.timer = TimerState::Idle;
                self.advance(now);
                true
            }
            _ => false,
        }
    }

    /// Time left on the current question's countdown, if one is running.
    pub fn countdown_remaining(&self, now: Instant) -> Option<Duration> {
        match self.timer {
            TimerState::Counting { deadline } => Some(deadline.saturating_duration_since(now)),
            _ => None,
        }
    }

    /// True during the pause between countdown expiry and auto-advance.
    pub fn in_timeout_pause(&self) -> bool {
        matches!(self.timer, TimerState::Grace { .. })
    }

    /// Highlight classification for an option of the current question. All
    /// options are unselected until an answer (or timeout) is recorded.
    pub fn marking(&self, option: usize) -> OptionMarking {
        let Some(question) = self.current_question() else {
            return OptionMarking::Unselected;
        };
        match self.answers[self.current] {
            Recorded::Unanswered => OptionMarking::Unselected,
            Recorded::Choice(chosen) => {
                if option == question.answer {
                    OptionMarking::Correct
                } else if option == chosen {
                    OptionMarking::IncorrectSelected
                } else {
                    OptionMarking::Unselected
                }
            }
            Recorded::TimedOut => {
                if option == question.answer {
                    OptionMarking::Correct
                } else {
                    OptionMarking::Unselected
                }
            }
        }
    }

    /// Per-question results for the review screen.
    pub fn review(&self) -> Vec<AnswerReview> {
        self.answers
            .iter()
            .zip(self.quiz.questions.iter())
            .map(|(recorded, question)| {
                let selected = recorded
                    .choice()
                    .map(|c| question.options[c].clone());
                AnswerReview {
                    prompt: question.text.clone(),
                    is_correct: recorded.choice().is_some_and(|c| question.is_correct(c)),
                    correct: question.correct_option().to_string(),
                    selected,
                }
            })
            .collect()
    }

    fn advance(&mut self, now: Instant) {
        self.current += 1;
        if self.is_finished() {
            self.timer = TimerState::Idle;
            debug!("session finished with score {}/{}", self.score, self.total());
        } else {
            self.enter_current(now);
        }
    }

    /// Entering a question replaces the timer state wholesale, so a pending
    /// deadline from a previous question can never fire against this one. The
    /// countdown is armed fresh (never resumed) and only while the question
    /// is still unanswered.
    fn enter_current(&mut self, now: Instant) {
        self.timer = TimerState::Idle;
        if self.mode == SessionMode::Timed
            && !self.is_finished()
            && self.answers[self.current].is_unanswered()
        {
            self.timer = TimerState::Counting {
                deadline: now + QUESTION_TIME,
            };
        }
    }
}
