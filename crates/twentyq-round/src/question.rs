//! Recorded questions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Affirmative,
    Negative,
    Unknown,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affirmative => write!(f, "yes"),
            Self::Negative => write!(f, "no"),
            Self::Unknown => write!(f, "unsure"),
        }
    }
}

/// One entry in the question log. Never edited once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub content: String,
    pub outcome: Outcome,
}
