use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::QuestionKey;

/// Answers collected over one questionnaire session
///
/// Missing and blank answers are both treated as "no constraint" by the
/// recommendation engine. Unknown keys and `null` values are dropped when
/// deserializing so that partial forms are always accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionKey, String>,
}

impl AnswerSet {
    /// Creates an empty answer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the answer to a question
    pub fn set(&mut self, key: QuestionKey, answer: impl Into<String>) {
        self.answers.insert(key, answer.into());
    }

    /// Chaining variant of [`AnswerSet::set`]
    pub fn with(mut self, key: QuestionKey, answer: impl Into<String>) -> Self {
        self.set(key, answer);
        self
    }

    /// The raw answer as typed by the user
    pub fn get(&self, key: QuestionKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    /// The trimmed answer, or `None` when it is absent or blank
    pub fn answered(&self, key: QuestionKey) -> Option<&str> {
        self.get(key).map(str::trim).filter(|a| !a.is_empty())
    }

    /// The answer trimmed and lower-cased for matching; empty when absent
    pub fn normalized(&self, key: QuestionKey) -> String {
        self.get(key)
            .map(|a| a.trim().to_lowercase())
            .unwrap_or_default()
    }

    /// True once every question has an entry
    pub fn is_complete(&self) -> bool {
        QuestionKey::ALL.iter().all(|k| self.answers.contains_key(k))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(QuestionKey, S)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (QuestionKey, S)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, Option<String>> = HashMap::deserialize(deserializer)?;
        let answers = raw
            .into_iter()
            .filter_map(|(key, value)| match (key.parse::<QuestionKey>(), value) {
                (Ok(key), Some(value)) => Some((key, value)),
                _ => None,
            })
            .collect();
        Ok(Self { answers })
    }
}
