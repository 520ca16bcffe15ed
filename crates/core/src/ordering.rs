//! Canonical display order of the running question list.
//!
//! The order is anchored on enumeration ids, never on indices: a subset
//! draw changes indices between loads, ids stay put.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{EnumerationId, Question};

/// Where questions whose id is missing from a persisted order end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmatchedPlacement {
    /// After all matched questions, keeping their bank order.
    #[default]
    End,
    /// At position 0, ahead of everything (legacy layout).
    Front,
}

/// Result of arranging a question list.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub questions: Vec<Question>,
    /// Canonical order to persist; always derived from `questions`.
    pub order: Vec<EnumerationId>,
    /// True when a fresh permutation was drawn instead of restoring.
    pub reshuffled: bool,
}

/// Unbiased in-place permutation (Fisher–Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Enumeration ids of `questions`, in list order.
#[must_use]
pub fn order_of(questions: &[Question]) -> Vec<EnumerationId> {
    questions.iter().map(Question::enumeration).collect()
}

/// Restore `persisted` when it is a duplicate-free order of the same length,
/// otherwise draw a fresh permutation. Ids of `persisted` that are not in the
/// bank are tolerated and handled by `placement`.
pub fn arrange<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    persisted: &[EnumerationId],
    placement: UnmatchedPlacement,
    rng: &mut R,
) -> Arrangement {
    let restorable = !persisted.is_empty()
        && persisted.len() == questions.len()
        && is_distinct(persisted);
    if restorable {
        reorder(&mut questions, persisted, placement);
    } else {
        shuffle(&mut questions, rng);
    }
    let order = order_of(&questions);
    Arrangement {
        questions,
        order,
        reshuffled: !restorable,
    }
}

fn is_distinct(order: &[EnumerationId]) -> bool {
    order.iter().collect::<HashSet<_>>().len() == order.len()
}

/// Stable reorder of `questions` so each sits at the index of its id in
/// `order`.
pub fn reorder(questions: &mut [Question], order: &[EnumerationId], placement: UnmatchedPlacement) {
    let positions: HashMap<EnumerationId, usize> = order
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx))
        .collect();
    let fallback = match placement {
        UnmatchedPlacement::End => usize::MAX,
        UnmatchedPlacement::Front => 0,
    };
    questions.sort_by_key(|q| positions.get(&q.enumeration()).copied().unwrap_or(fallback));
}
