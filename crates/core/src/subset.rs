//! "How many questions" policy and the random subset it draws.

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use rand::Rng;

use crate::model::{EnumerationId, Question};
use crate::ordering::shuffle;

/// User-selected number of questions to run with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubsetPolicy {
    #[default]
    All,
    Count(NonZeroUsize),
}

impl SubsetPolicy {
    /// Lenient parse used for persisted and user-entered values: anything
    /// that is not a positive integer means `All`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self::All, Self::Count)
    }

    /// Length of the list this policy yields from `total` questions.
    #[must_use]
    pub fn effective_len(self, total: usize) -> usize {
        match self {
            Self::All => total,
            Self::Count(n) => n.get().min(total),
        }
    }

    /// True when the policy actually trims a bank of `total` questions.
    #[must_use]
    pub fn trims(self, total: usize) -> bool {
        matches!(self, Self::Count(n) if n.get() < total)
    }
}

impl fmt::Display for SubsetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for SubsetPolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Apply `policy` to `questions`.
///
/// A trimming policy shuffles the whole list and keeps the first `n`, so the
/// cost is linear in the bank size.
pub fn select<R: Rng + ?Sized>(
    policy: SubsetPolicy,
    mut questions: Vec<Question>,
    rng: &mut R,
) -> Vec<Question> {
    let SubsetPolicy::Count(n) = policy else {
        return questions;
    };
    if n.get() >= questions.len() {
        return questions;
    }
    shuffle(&mut questions, rng);
    questions.truncate(n.get());
    questions
}

/// Re-select the subset named by a persisted order.
///
/// For `All` (or a count that does not trim) the whole bank is the
/// candidate list. For a trimming count, the bank is filtered down to the ids
/// in `order`; the result is `None` unless exactly `n` distinct questions
/// matched, in which case the caller draws a fresh subset.
#[must_use]
pub fn retain_persisted(
    policy: SubsetPolicy,
    questions: &[Question],
    order: &[EnumerationId],
) -> Option<Vec<Question>> {
    let total = questions.len();
    let expected = policy.effective_len(total);
    if order.len() != expected {
        return None;
    }
    if !policy.trims(total) {
        return Some(questions.to_vec());
    }
    let wanted: HashSet<EnumerationId> = order.iter().copied().collect();
    let kept: Vec<Question> = questions
        .iter()
        .filter(|q| wanted.contains(&q.enumeration()))
        .cloned()
        .collect();
    (kept.len() == expected).then_some(kept)
}
