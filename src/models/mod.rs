mod quiz;

pub use quiz::{Difficulty, Question, Quiz, NUM_OPTIONS};
