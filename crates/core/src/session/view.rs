use chrono::{DateTime, Utc};

use crate::model::{ChoiceKey, EnumerationId, Question, SessionState};
use crate::pagination::Pagination;
use crate::scoring::{self, Score};

/// Correctness marker shown next to a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub key: ChoiceKey,
    pub text: String,
    pub selected: bool,
    /// Set only once the question is revealed.
    pub mark: Option<ChoiceMark>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub position: usize,
    pub enumeration: EnumerationId,
    pub text: String,
    pub choices: Vec<ChoiceView>,
    pub selected: Option<ChoiceKey>,
    pub revealed: bool,
    /// Correct keys; empty until revealed.
    pub correct_keys: Vec<ChoiceKey>,
}

/// Everything the rendering layer needs for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub indicator: String,
    pub progress_percent: u8,
    pub can_prev: bool,
    pub can_next: bool,
    pub can_submit: bool,
    pub reset_pending: bool,
    pub questions: Vec<QuestionView>,
}

impl PageView {
    pub(crate) fn build(
        questions: &[Question],
        state: &SessionState,
        pagination: &Pagination,
        reset_pending: bool,
    ) -> Self {
        let questions_on_page = pagination
            .range()
            .filter_map(|position| {
                questions
                    .get(position)
                    .map(|q| question_view(position, q, state))
            })
            .collect();

        Self {
            page: pagination.page().get(),
            total_pages: pagination.total_pages().get(),
            page_size: pagination.page_size().get(),
            total_questions: questions.len(),
            answered: state.answered_count(),
            indicator: pagination.indicator(),
            progress_percent: pagination.progress_percent(),
            can_prev: pagination.can_prev(),
            can_next: pagination.can_next(),
            can_submit: pagination.can_submit(),
            reset_pending,
            questions: questions_on_page,
        }
    }
}

fn question_view(position: usize, question: &Question, state: &SessionState) -> QuestionView {
    let selected = state.answer(position).cloned();
    let revealed = state.is_revealed(position);
    let choices = question
        .options()
        .iter()
        .map(|choice| {
            let is_selected = selected.as_ref() == Some(&choice.key);
            let mark = revealed
                .then(|| choice_mark(question.is_correct(&choice.key), is_selected))
                .flatten();
            ChoiceView {
                key: choice.key.clone(),
                text: choice.text.clone(),
                selected: is_selected,
                mark,
            }
        })
        .collect();

    QuestionView {
        position,
        enumeration: question.enumeration(),
        text: question.text().to_string(),
        choices,
        selected,
        revealed,
        correct_keys: if revealed {
            question.correct().iter().cloned().collect()
        } else {
            Vec::new()
        },
    }
}

fn choice_mark(is_correct: bool, is_selected: bool) -> Option<ChoiceMark> {
    match (is_correct, is_selected) {
        (true, _) => Some(ChoiceMark::Correct),
        (false, true) => Some(ChoiceMark::Incorrect),
        (false, false) => None,
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultOption {
    pub key: ChoiceKey,
    pub text: String,
    pub mark: Option<ChoiceMark>,
}

/// Review line for one question after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub enumeration: EnumerationId,
    pub text: String,
    pub answer: Option<ChoiceKey>,
    pub correct_keys: Vec<ChoiceKey>,
    pub is_correct: bool,
    pub options: Vec<ResultOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultReport {
    pub score: Score,
    pub submitted_at: DateTime<Utc>,
    pub rows: Vec<ResultRow>,
}

impl ResultReport {
    pub(crate) fn build(
        questions: &[Question],
        state: &SessionState,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let rows = questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let answer = state.answer(position).cloned();
                let options = question
                    .options()
                    .iter()
                    .map(|choice| ResultOption {
                        key: choice.key.clone(),
                        text: choice.text.clone(),
                        mark: choice_mark(
                            question.is_correct(&choice.key),
                            answer.as_ref() == Some(&choice.key),
                        ),
                    })
                    .collect();
                ResultRow {
                    enumeration: question.enumeration(),
                    text: question.text().to_string(),
                    is_correct: scoring::is_correct(question, answer.as_ref()),
                    answer,
                    correct_keys: question.correct().iter().cloned().collect(),
                    options,
                }
            })
            .collect();

        Self {
            score: scoring::score(questions, state.answers()),
            submitted_at,
            rows,
        }
    }
}
