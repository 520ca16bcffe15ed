use crate::model::{ChoiceKey, Question};

/// Final score, reported verbatim as `correct` out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// True when `answer` is one of the question's correct keys.
///
/// Unanswered questions never count; a multi-answer question accepts any
/// single correct pick and gives no partial credit.
#[must_use]
pub fn is_correct(question: &Question, answer: Option<&ChoiceKey>) -> bool {
    answer.is_some_and(|key| question.is_correct(key))
}

/// Score `answers` against `questions`, position by position.
#[must_use]
pub fn score(questions: &[Question], answers: &[Option<ChoiceKey>]) -> Score {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(idx, q)| is_correct(q, answers.get(*idx).and_then(Option::as_ref)))
        .count();
    Score {
        correct,
        total: questions.len(),
    }
}
