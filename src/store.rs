//! Quiz persistence.
//!
//! The store owns the in-memory collection and the path of the backing JSON
//! document. The whole document is rewritten after every mutation; there is
//! no atomic rename or backup, so a crash mid-write can corrupt the file.
//! A missing or malformed document is silently replaced with the default
//! collection (see [`LoadOutcome`]).

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Question, Quiz, NUM_OPTIONS};

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// IO error while writing the backing document.
    Io(io::Error),
    /// Error serializing the collection.
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialize(err)
    }
}

/// How the collection was obtained on open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The backing document existed and parsed.
    Loaded,
    /// The default collection was substituted and persisted.
    Defaulted(DefaultReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    Missing,
    Malformed(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::Missing => write!(f, "document missing"),
            DefaultReason::Malformed(reason) => write!(f, "document malformed: {}", reason),
        }
    }
}

/// The persisted shape: an insertion-ordered array under `quizzes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizCollection {
    pub quizzes: Vec<Quiz>,
}

impl QuizCollection {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for quiz in &self.quizzes {
            if !seen.insert(quiz.id.as_str()) {
                return Err(format!("duplicate quiz id '{}'", quiz.id));
            }
            quiz.validate()?;
        }
        Ok(())
    }
}

/// Either the canonical collection or a flat top-level question array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Collection(QuizCollection),
    FlatQuestions(Vec<FlatQuestion>),
}

/// Question shape used by flat documents.
#[derive(Deserialize)]
struct FlatQuestion {
    question: String,
    options: [String; NUM_OPTIONS],
    answer: AnswerRef,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    image: Option<PathBuf>,
}

/// The flat shape historically referenced the answer by literal option text;
/// indexes are canonical, so text is resolved to an index at load time.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerRef {
    Index(usize),
    Text(String),
}

impl FlatQuestion {
    fn into_question(self) -> Result<Question, String> {
        let answer = match self.answer {
            AnswerRef::Index(i) => i,
            AnswerRef::Text(text) => self
                .options
                .iter()
                .position(|opt| *opt == text)
                .ok_or_else(|| format!("answer '{}' matches no option of '{}'", text, self.question))?,
        };
        Ok(Question {
            text: self.question,
            options: self.options,
            answer,
            image: self.image,
            difficulty: self.difficulty,
        })
    }
}

fn default_collection() -> QuizCollection {
    QuizCollection {
        quizzes: vec![Quiz {
            id: "general_knowledge".to_string(),
            title: "General Knowledge".to_string(),
            description: "Test your knowledge about various topics".to_string(),
            difficulty: Difficulty::Medium,
            category: Some("General".to_string()),
            questions: vec![Question {
                text: "What is the capital of France?".to_string(),
                options: [
                    "London".to_string(),
                    "Berlin".to_string(),
                    "Paris".to_string(),
                    "Madrid".to_string(),
                ],
                answer: 2,
                image: None,
                difficulty: None,
            }],
        }],
    }
}

/// Loads and saves the quiz collection.
pub struct QuizStore {
    path: PathBuf,
    collection: QuizCollection,
}

impl QuizStore {
    /// Open the store at `path`.
    ///
    /// A missing or malformed document never fails: the default collection is
    /// substituted and persisted, and the outcome reports why. Only a failure
    /// to persist those defaults propagates.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, LoadOutcome), StoreError> {
        let path = path.as_ref().to_path_buf();

        let reason = match fs::read_to_string(&path) {
            Ok(content) => match parse_document(&content) {
                Ok(collection) => {
                    info!(
                        "loaded {} quizzes from {}",
                        collection.quizzes.len(),
                        path.display()
                    );
                    let store = Self { path, collection };
                    return Ok((store, LoadOutcome::Loaded));
                }
                Err(reason) => DefaultReason::Malformed(reason),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => DefaultReason::Missing,
            Err(e) => DefaultReason::Malformed(e.to_string()),
        };

        warn!("{}; substituting default collection", reason);
        let store = Self {
            path,
            collection: default_collection(),
        };
        store.save()?;
        Ok((store, LoadOutcome::Defaulted(reason)))
    }

    /// Serialize the full collection back to the document, overwriting it.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.collection)?;
        fs::write(&self.path, json)?;
        debug!(
            "saved {} quizzes to {}",
            self.collection.quizzes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Append a quiz and persist.
    pub fn add(&mut self, quiz: Quiz) -> Result<(), StoreError> {
        info!("adding quiz '{}' ({})", quiz.title, quiz.id);
        self.collection.quizzes.push(quiz);
        self.save()
    }

    /// Remove the quiz with the given id and persist. Removing an unknown id
    /// is a no-op.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.collection.quizzes.len();
        self.collection.quizzes.retain(|quiz| quiz.id != id);
        if self.collection.quizzes.len() == before {
            debug!("remove of unknown quiz id '{}' ignored", id);
            return Ok(());
        }
        info!("removed quiz '{}'", id);
        self.save()
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.collection.quizzes
    }

    pub fn get(&self, id: &str) -> Option<&Quiz> {
        self.collection.quizzes.iter().find(|quiz| quiz.id == id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_document(content: &str) -> Result<QuizCollection, String> {
    let document: StoredDocument = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let collection = match document {
        StoredDocument::Collection(collection) => collection,
        StoredDocument::FlatQuestions(flat) => {
            let questions = flat
                .into_iter()
                .map(FlatQuestion::into_question)
                .collect::<Result<Vec<_>, _>>()?;
            QuizCollection {
                quizzes: vec![Quiz {
                    id: "imported".to_string(),
                    title: "Imported Quiz".to_string(),
                    description: "Imported from a flat question document".to_string(),
                    difficulty: Difficulty::Medium,
                    category: None,
                    questions,
                }],
            }
        }
    };

    collection.validate()?;
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("quizmaster-test-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_missing_document_yields_persisted_defaults() {
        let path = temp_path();

        let (store, outcome) = QuizStore::open(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Defaulted(DefaultReason::Missing));
        assert_eq!(store.quizzes().len(), 1);
        assert_eq!(store.quizzes()[0].id, "general_knowledge");

        // The defaults were written, so a second open loads the same content.
        let (store, outcome) = QuizStore::open(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(store.quizzes()[0].title, "General Knowledge");
        assert_eq!(store.quizzes()[0].questions[0].answer, 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_document_is_replaced() {
        let path = temp_path();
        fs::write(&path, "{ not json").unwrap();

        let (store, outcome) = QuizStore::open(&path).unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted(DefaultReason::Malformed(_))
        ));
        assert_eq!(store.quizzes().len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_out_of_range_answer_counts_as_malformed() {
        let path = temp_path();
        fs::write(
            &path,
            r#"{"quizzes": [{"id": "q", "title": "Q", "difficulty": "Easy",
                "questions": [{"text": "?", "options": ["a","b","c","d"], "answer": 9}]}]}"#,
        )
        .unwrap();

        let (_, outcome) = QuizStore::open(&path).unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted(DefaultReason::Malformed(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_flat_document_is_normalized() {
        let path = temp_path();
        fs::write(
            &path,
            r#"[
                {"question": "Largest planet?", "options": ["Mars","Jupiter","Venus","Saturn"],
                 "answer": "Jupiter", "difficulty": "Easy", "image": "planets/jupiter.png"},
                {"question": "2 + 2?", "options": ["3","4","5","6"], "answer": 1}
            ]"#,
        )
        .unwrap();

        let (store, outcome) = QuizStore::open(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);

        let quiz = &store.quizzes()[0];
        assert_eq!(quiz.questions.len(), 2);
        // Literal-text answer resolved to an index.
        assert_eq!(quiz.questions[0].answer, 1);
        assert_eq!(quiz.questions[0].difficulty, Some(Difficulty::Easy));
        assert!(quiz.questions[0].image.is_some());
        assert_eq!(quiz.questions[1].answer, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_flat_document_with_unresolvable_answer_is_malformed() {
        let path = temp_path();
        fs::write(
            &path,
            r#"[{"question": "?", "options": ["a","b","c","d"], "answer": "z"}]"#,
        )
        .unwrap();

        let (_, outcome) = QuizStore::open(&path).unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted(DefaultReason::Malformed(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_add_and_remove_persist() {
        let path = temp_path();
        let (mut store, _) = QuizStore::open(&path).unwrap();

        let quiz = Quiz {
            id: "history".to_string(),
            title: "History".to_string(),
            description: String::new(),
            difficulty: Difficulty::Hard,
            category: None,
            questions: Vec::new(),
        };
        store.add(quiz).unwrap();
        assert_eq!(store.quizzes().len(), 2);

        // Insertion order survives a reload.
        let (store2, _) = QuizStore::open(&path).unwrap();
        assert_eq!(store2.quizzes()[1].id, "history");

        store.remove("history").unwrap();
        assert_eq!(store.quizzes().len(), 1);

        // Removing a non-existent id is a no-op, not an error.
        store.remove("history").unwrap();
        assert_eq!(store.quizzes().len(), 1);

        fs::remove_file(&path).unwrap();
    }
}
