//! In-progress survey answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A respondent's answer to one question.
///
/// Serialized untagged so the stored JSON matches what the survey front end
/// sends: a plain string, or an array of strings for multi-select questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choices(Vec<String>),
}

impl Answer {
    /// Empty strings (after trimming) and empty lists count as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Choices(values) => values.is_empty(),
        }
    }

    /// Human-readable rendering, with multi-select values joined by `, `.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Choices(values) => values.join(", "),
        }
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Answer>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.0.get(question_id)
    }

    /// Set a single-valued answer, replacing whatever was there.
    pub fn set_text(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), Answer::Text(value.into()));
    }

    /// Add `option` to a multi-select answer, or remove it if already chosen.
    ///
    /// Returns the field's value after the toggle. A text value already
    /// stored under the id is replaced by a fresh list.
    pub fn toggle_option(&mut self, question_id: &str, option: &str) -> &Answer {
        let entry = self
            .0
            .entry(question_id.to_string())
            .or_insert_with(|| Answer::Choices(Vec::new()));

        if matches!(entry, Answer::Text(_)) {
            *entry = Answer::Choices(Vec::new());
        }

        if let Answer::Choices(values) = &mut *entry {
            match values.iter().position(|v| v == option) {
                Some(idx) => {
                    values.remove(idx);
                }
                None => values.push(option.to_string()),
            }
        }

        entry
    }

    pub fn clear(&mut self, question_id: &str) -> Option<Answer> {
        self.0.remove(question_id)
    }

    /// Whether the question has a non-empty answer.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|a| !a.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Answer)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, Answer)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
