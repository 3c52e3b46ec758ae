use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// One of the fixed questionnaire questions, declared in the order they are asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKey {
    Age,
    Gender,
    Type,
    Occasion,
    Mood,
    Scents,
    Personality,
}

impl QuestionKey {
    /// All questions in asking order
    pub const ALL: [QuestionKey; 7] = [
        QuestionKey::Age,
        QuestionKey::Gender,
        QuestionKey::Type,
        QuestionKey::Occasion,
        QuestionKey::Mood,
        QuestionKey::Scents,
        QuestionKey::Personality,
    ];

    /// The question a new session starts with
    pub fn first() -> Self {
        QuestionKey::Age
    }

    /// The question asked after this one, or `None` once the last one is answered
    pub fn next(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|k| *k == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKey::Age => "age",
            QuestionKey::Gender => "gender",
            QuestionKey::Type => "type",
            QuestionKey::Occasion => "occasion",
            QuestionKey::Mood => "mood",
            QuestionKey::Scents => "scents",
            QuestionKey::Personality => "personality",
        }
    }

    /// Prompt shown to the user for this question
    pub fn prompt(self) -> &'static str {
        match self {
            QuestionKey::Age => "What is your age?",
            QuestionKey::Gender => "What is your gender? (men/women/unisex)",
            QuestionKey::Type => {
                "Do you want a designer perfume or a customized blend? (designer/customized)"
            }
            QuestionKey::Occasion => "What is the occasion for which you want the perfume?",
            QuestionKey::Mood => "How would you describe your mood?",
            QuestionKey::Scents => "What scents do you like? (e.g., citrus, floral, woody)",
            QuestionKey::Personality => "How would you describe your personality?",
        }
    }
}

impl Display for QuestionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string does not name a questionnaire question
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown question: {0}")]
pub struct UnknownQuestion(pub String);

impl FromStr for QuestionKey {
    type Err = UnknownQuestion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownQuestion(s.to_string()))
    }
}
