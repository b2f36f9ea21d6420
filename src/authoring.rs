//! Quiz authoring.
//!
//! A [`QuizDraft`] collects the raw form fields. Nothing touches the store
//! until [`QuizDraft::build`] has validated the whole draft and assembled a
//! canonical [`Quiz`] with a fresh id.

use std::fmt;

use log::debug;
use uuid::Uuid;

use crate::models::{Difficulty, Question, Quiz, NUM_OPTIONS};

/// A question being authored: prompt, four options, and which option is the
/// correct one.
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: [String; NUM_OPTIONS],
    pub correct: usize,
}

/// Raw field values for a new quiz.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub questions: Vec<QuestionDraft>,
}

/// Validation failure, scoped to the first violated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Title,
    Difficulty,
    /// Question at this index has a blank prompt.
    QuestionPrompt(usize),
    /// Question/option at these indexes is blank.
    QuestionOption(usize, usize),
    /// Question at this index marks a correct option that does not exist.
    QuestionAnswer(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Title => write!(f, "Please enter a title"),
            ValidationError::Difficulty => write!(f, "Please enter a difficulty"),
            ValidationError::QuestionPrompt(i) => {
                write!(f, "Question {} needs a prompt", i + 1)
            }
            ValidationError::QuestionOption(i, j) => {
                write!(f, "Question {}, option {} must be filled", i + 1, j + 1)
            }
            ValidationError::QuestionAnswer(i) => {
                write!(f, "Question {} must mark one of its options correct", i + 1)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl QuizDraft {
    /// A fresh draft with one blank question, ready for the form.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: "Easy".to_string(),
            category: String::new(),
            questions: vec![QuestionDraft::default()],
        }
    }

    /// Append a blank draft question.
    pub fn add_question(&mut self) {
        self.questions.push(QuestionDraft::default());
    }

    /// Remove the draft question at `index`. Out-of-range indexes are ignored.
    pub fn remove_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    /// Validate the draft and assemble a canonical quiz.
    ///
    /// Category defaults to the difficulty when left blank; the id is a fresh
    /// UUIDv4. The caller is expected to re-prompt on error.
    pub fn build(&self) -> Result<Quiz, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Title);
        }

        let difficulty = self.difficulty.trim();
        if difficulty.is_empty() {
            return Err(ValidationError::Difficulty);
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (i, draft) in self.questions.iter().enumerate() {
            let prompt = draft.prompt.trim();
            if prompt.is_empty() {
                return Err(ValidationError::QuestionPrompt(i));
            }
            for (j, option) in draft.options.iter().enumerate() {
                if option.trim().is_empty() {
                    return Err(ValidationError::QuestionOption(i, j));
                }
            }
            // The form's marker can only point at an existing option, but the
            // draft fields are public; the answer index must resolve.
            if draft.correct >= NUM_OPTIONS {
                return Err(ValidationError::QuestionAnswer(i));
            }

            questions.push(Question {
                text: prompt.to_string(),
                options: std::array::from_fn(|j| draft.options[j].trim().to_string()),
                answer: draft.correct,
                image: None,
                difficulty: None,
            });
        }

        let category = self.category.trim();
        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            difficulty: Difficulty::parse(difficulty),
            category: Some(if category.is_empty() {
                difficulty.to_string()
            } else {
                category.to_string()
            }),
            questions,
        };

        debug!("assembled quiz '{}' ({})", quiz.title, quiz.id);
        Ok(quiz)
    }
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> QuizDraft {
        let mut draft = QuizDraft::new();
        draft.title = "Capitals".to_string();
        draft.description = "European capitals".to_string();
        draft.difficulty = "Medium".to_string();
        draft.questions[0] = QuestionDraft {
            prompt: "What is the capital of France?".to_string(),
            options: [
                "London".to_string(),
                "Berlin".to_string(),
                "Paris".to_string(),
                "Madrid".to_string(),
            ],
            correct: 2,
        };
        draft
    }

    #[test]
    fn test_build_assembles_canonical_quiz() {
        let quiz = filled_draft().build().unwrap();
        assert_eq!(quiz.title, "Capitals");
        assert_eq!(quiz.difficulty, Difficulty::Medium);
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].answer, 2);
        // Blank category defaults to the difficulty.
        assert_eq!(quiz.category.as_deref(), Some("Medium"));
        assert!(!quiz.id.is_empty());
    }

    #[test]
    fn test_build_ids_are_unique() {
        let draft = filled_draft();
        let a = draft.build().unwrap();
        let b = draft.build().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut draft = filled_draft();
        draft.title = "   ".to_string();
        assert_eq!(draft.build().unwrap_err(), ValidationError::Title);
    }

    #[test]
    fn test_blank_prompt_and_option_rejected() {
        let mut draft = filled_draft();
        draft.questions[0].prompt = String::new();
        assert_eq!(draft.build().unwrap_err(), ValidationError::QuestionPrompt(0));

        let mut draft = filled_draft();
        draft.questions[0].options[3] = "  ".to_string();
        assert_eq!(
            draft.build().unwrap_err(),
            ValidationError::QuestionOption(0, 3)
        );
    }

    #[test]
    fn test_out_of_range_correct_marker_rejected() {
        let mut draft = filled_draft();
        draft.questions[0].correct = 7;
        assert_eq!(draft.build().unwrap_err(), ValidationError::QuestionAnswer(0));

        // Anything build() accepts satisfies the model invariant.
        draft.questions[0].correct = 3;
        assert!(draft.build().unwrap().validate().is_ok());
    }

    #[test]
    fn test_question_list_edits() {
        let mut draft = QuizDraft::new();
        draft.add_question();
        draft.add_question();
        assert_eq!(draft.questions.len(), 3);

        draft.remove_question(1);
        assert_eq!(draft.questions.len(), 2);

        // Out of range is a no-op.
        draft.remove_question(10);
        assert_eq!(draft.questions.len(), 2);
    }
}
