use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Every question carries exactly this many options.
pub const NUM_OPTIONS: usize = 4;

/// Quiz difficulty. The well-known levels get their own variants; anything
/// else typed into the authoring form is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn parse(s: &str) -> Self {
        match s {
            "Easy" => Self::Easy,
            "Medium" => Self::Medium,
            "Hard" => Self::Hard,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A single multiple-choice question.
///
/// `answer` is an index into `options`. `image` and `difficulty` are only
/// present on questions imported from a flat question document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; NUM_OPTIONS],
    pub answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.answer]
    }

    /// The answer index must resolve to one of the listed options.
    pub fn validate(&self) -> Result<(), String> {
        if self.answer >= self.options.len() {
            return Err(format!(
                "answer index {} out of range for question '{}'",
                self.answer, self.text
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Category used for grouping on the menu; falls back to the difficulty
    /// string when no category was recorded.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(self.difficulty.as_str())
    }

    pub fn validate(&self) -> Result<(), String> {
        for question in &self.questions {
            question.validate()?;
        }
        Ok(())
    }
}
