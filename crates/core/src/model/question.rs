use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::{ChoiceKey, EnumerationId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no enumeration id")]
    MissingEnumeration,

    #[error("question {0} has empty text")]
    EmptyText(EnumerationId),

    #[error("question {0} has no options")]
    NoOptions(EnumerationId),

    #[error("question {id} has an invalid choice key: {raw:?}")]
    InvalidChoiceKey { id: EnumerationId, raw: String },
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Raw question record as it appears in the bank document.
///
/// Every field is optional so that one bad record never fails the whole
/// bank; `QuestionRecord::validate` decides whether it is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub enumeration: Option<u64>,
    #[serde(default)]
    pub question: Option<String>,
    /// Choices keyed by their label. Display order is key order, not the
    /// order the keys appear in the document.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub correct: Vec<String>,
}

impl QuestionRecord {
    /// Turn the raw record into a validated `Question`.
    ///
    /// Correct keys that do not name an option are kept out of the correct
    /// set; a question whose correct set ends up empty is still valid (it can
    /// simply never be answered correctly).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id, text or options are missing.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self
            .enumeration
            .map(EnumerationId::new)
            .ok_or(QuestionError::MissingEnumeration)?;

        let text = self.question.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText(id));
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (raw, choice_text) in self.options {
            let key = ChoiceKey::new(raw.clone())
                .map_err(|_| QuestionError::InvalidChoiceKey { id, raw })?;
            options.push(Choice {
                key,
                text: choice_text,
            });
        }

        let correct = self
            .correct
            .into_iter()
            .filter_map(|raw| ChoiceKey::new(raw).ok())
            .filter(|key| options.iter().any(|choice| &choice.key == key))
            .collect();

        Ok(Question {
            enumeration: id,
            text,
            options,
            correct,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One answer choice of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: ChoiceKey,
    pub text: String,
}

/// A validated, immutable multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    enumeration: EnumerationId,
    text: String,
    options: Vec<Choice>,
    correct: BTreeSet<ChoiceKey>,
}

impl Question {
    #[must_use]
    pub fn enumeration(&self) -> EnumerationId {
        self.enumeration
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Choices in key order.
    #[must_use]
    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &BTreeSet<ChoiceKey> {
        &self.correct
    }

    #[must_use]
    pub fn has_option(&self, key: &ChoiceKey) -> bool {
        self.options.iter().any(|choice| &choice.key == key)
    }

    #[must_use]
    pub fn is_correct(&self, key: &ChoiceKey) -> bool {
        self.correct.contains(key)
    }
}

/// Validate a batch of records, keeping the usable ones in bank order.
///
/// Returns the questions together with the rejection reason of every
/// dropped record so callers can log them.
#[must_use]
pub fn filter_records(
    records: impl IntoIterator<Item = QuestionRecord>,
) -> (Vec<Question>, Vec<QuestionError>) {
    let mut questions = Vec::new();
    let mut rejected = Vec::new();
    for record in records {
        match record.validate() {
            Ok(question) => questions.push(question),
            Err(err) => rejected.push(err),
        }
    }
    (questions, rejected)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, text: &str, options: &[(&str, &str)], correct: &[&str]) -> QuestionRecord {
        QuestionRecord {
            enumeration: Some(id),
            question: Some(text.to_string()),
            options: options
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            correct: correct.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn validate_keeps_options_in_key_order() {
        let question = record(3, "Pick one", &[("B", "two"), ("A", "one")], &["B"])
            .validate()
            .unwrap();
        let keys: Vec<_> = question.options().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert!(question.is_correct(&ChoiceKey::new("B").unwrap()));
    }

    #[test]
    fn decoded_options_are_sorted_by_key() {
        let record: QuestionRecord = serde_json::from_str(
            r#"{"enumeration": 4, "question": "Q", "options": {"C": "c", "A": "a", "B": "b"}, "correct": ["C"]}"#,
        )
        .unwrap();
        let question = record.validate().unwrap();
        let keys: Vec<_> = question.options().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn validate_rejects_empty_text_and_options() {
        let err = record(1, "  ", &[("A", "x")], &["A"]).validate().unwrap_err();
        assert_eq!(err, QuestionError::EmptyText(EnumerationId::new(1)));

        let err = record(2, "Q", &[], &[]).validate().unwrap_err();
        assert_eq!(err, QuestionError::NoOptions(EnumerationId::new(2)));

        let err = QuestionRecord::default().validate().unwrap_err();
        assert_eq!(err, QuestionError::MissingEnumeration);
    }

    #[test]
    fn correct_keys_outside_options_are_dropped() {
        let question = record(4, "Q", &[("A", "x"), ("B", "y")], &["A", "Z", " "])
            .validate()
            .unwrap();
        assert_eq!(question.correct().len(), 1);
    }

    #[test]
    fn filter_records_reports_rejections() {
        let records = vec![
            record(1, "Q1", &[("A", "x")], &["A"]),
            record(2, "", &[("A", "x")], &["A"]),
            record(3, "Q3", &[], &[]),
            record(4, "Q4", &[("A", "x"), ("B", "y")], &["B"]),
        ];
        let (questions, rejected) = filter_records(records);
        let ids: Vec<u64> = questions.iter().map(|q| q.enumeration().value()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let raw = r#"{"enumeration": 9, "question": "Which?", "options": {"A": "a"}}"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        assert!(record.correct.is_empty());
        assert!(record.validate().is_ok());
    }
}
