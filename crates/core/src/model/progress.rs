use std::num::NonZeroUsize;

use crate::model::ids::{ChoiceKey, EnumerationId};

/// Best-effort view of a persisted progress record.
///
/// Each field is decoded on its own; anything absent or malformed is left at
/// its default instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedProgress {
    pub order: Vec<EnumerationId>,
    pub answers: Vec<Option<ChoiceKey>>,
    pub revealed: Vec<bool>,
    pub page: Option<NonZeroUsize>,
    pub page_size: Option<NonZeroUsize>,
}

/// Per-position progress of the running quiz.
///
/// Positions index into the current (subset-selected, ordered) question
/// list. `ordered_enumerations` is the persisted anchor that lets a reload
/// map positions back to questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    ordered_enumerations: Vec<EnumerationId>,
    answers: Vec<Option<ChoiceKey>>,
    revealed: Vec<bool>,
    page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl SessionState {
    /// Fresh state for `order`: nothing answered, nothing revealed.
    #[must_use]
    pub fn fresh(order: Vec<EnumerationId>, page: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        let len = order.len();
        Self {
            ordered_enumerations: order,
            answers: vec![None; len],
            revealed: vec![false; len],
            page,
            page_size,
        }
    }

    /// Rehydrate state from persisted parts.
    ///
    /// Answers and reveal flags are trusted only as a pair and only when both
    /// match the order length; otherwise both are rebuilt empty.
    #[must_use]
    pub fn from_persisted(
        order: Vec<EnumerationId>,
        answers: Vec<Option<ChoiceKey>>,
        revealed: Vec<bool>,
        page: NonZeroUsize,
        page_size: NonZeroUsize,
    ) -> Self {
        let len = order.len();
        if answers.len() != len || revealed.len() != len {
            return Self::fresh(order, page, page_size);
        }
        Self {
            ordered_enumerations: order,
            answers,
            revealed,
            page,
            page_size,
        }
    }

    #[must_use]
    pub fn ordered_enumerations(&self) -> &[EnumerationId] {
        &self.ordered_enumerations
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<ChoiceKey>] {
        &self.answers
    }

    #[must_use]
    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    #[must_use]
    pub fn page(&self) -> NonZeroUsize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered_enumerations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered_enumerations.is_empty()
    }

    #[must_use]
    pub fn answer(&self, position: usize) -> Option<&ChoiceKey> {
        self.answers.get(position).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed.get(position).copied().unwrap_or(false)
    }

    /// Number of positions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Record `key` for `position`. Returns false when the position is out of
    /// range or already revealed.
    pub fn select(&mut self, position: usize, key: ChoiceKey) -> bool {
        if self.is_revealed(position) {
            return false;
        }
        match self.answers.get_mut(position) {
            Some(slot) if slot.as_ref() != Some(&key) => {
                *slot = Some(key);
                true
            }
            _ => false,
        }
    }

    /// Mark `position` revealed. Returns false when nothing changed.
    pub fn reveal(&mut self, position: usize) -> bool {
        match self.revealed.get_mut(position) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_page(&mut self, page: NonZeroUsize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
    }
}
