use std::num::NonZeroUsize;

use crate::model::ChoiceKey;
use crate::subset::SubsetPolicy;

/// Lifecycle of a quiz run.
///
/// `Loading` is held by whoever fetches the bank; a built `QuizSession` is
/// always `Active` or `Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Submitted,
}

/// Discrete user action fed back by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    SelectChoice { position: usize, key: ChoiceKey },
    Reveal { position: usize },
    PrevPage,
    NextPage,
    GoToPage(usize),
    SetPageSize(NonZeroUsize),
    SetSubsetPolicy(SubsetPolicy),
    Submit,
    RequestReset,
    CancelReset,
    ConfirmReset,
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Action rejected or a no-op; nothing changed.
    Ignored,
    /// Only transient view state changed (e.g. a pending confirmation).
    ViewOnly,
    /// Progress changed and must be saved.
    Persist,
    /// Subset policy changed: store it, drop all progress and rebuild.
    Reinitialize { policy: SubsetPolicy },
    /// Confirmed reset: erase everything and rebuild with defaults.
    Reset,
}

impl Effect {
    #[must_use]
    pub fn is_ignored(self) -> bool {
        matches!(self, Effect::Ignored)
    }
}
