//! Quiz session state machine.
//!
//! `QuizSession` is the single owner of in-memory quiz state. Every user
//! action goes through [`QuizSession::apply`], which mutates the session and
//! returns the [`Effect`] the caller must carry out (persist, rebuild, ...).
//! No I/O happens here.

mod action;
mod view;

use std::num::NonZeroUsize;

use rand::Rng;

use crate::location::ViewLocation;
use crate::model::{ChoiceKey, PersistedProgress, Question, SessionState};
use crate::ordering::{self, UnmatchedPlacement};
use crate::pagination::Pagination;
use crate::subset::{self, SubsetPolicy};
use crate::time::Clock;

pub use action::{Effect, Phase, QuizAction};
pub use view::{
    ChoiceMark, ChoiceView, PageView, QuestionView, ResultOption, ResultReport, ResultRow,
};

/// Knobs for building a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub placement: UnmatchedPlacement,
    pub clock: Clock,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    state: SessionState,
    policy: SubsetPolicy,
    phase: Phase,
    reset_pending: bool,
    location: ViewLocation,
    clock: Clock,
    report: Option<ResultReport>,
    reshuffled: bool,
}

impl QuizSession {
    /// Build the running session from the filtered bank and whatever progress
    /// survived in storage.
    ///
    /// - a persisted order that still describes the current subset is
    ///   restored verbatim; otherwise a fresh subset/permutation is drawn
    /// - answers and reveal flags survive only a restored order of the same
    ///   length, and answers naming unknown choices are dropped
    /// - `page`/`perPage` from `location` win when present, then persisted
    ///   values, then 1; the page is clamped to the available pages
    pub fn initialize<R: Rng + ?Sized>(
        bank: Vec<Question>,
        persisted: PersistedProgress,
        policy: SubsetPolicy,
        location: &ViewLocation,
        options: SessionOptions,
        rng: &mut R,
    ) -> Self {
        let arrangement = match subset::retain_persisted(policy, &bank, &persisted.order) {
            Some(candidates) => {
                ordering::arrange(candidates, &persisted.order, options.placement, rng)
            }
            None => {
                let selected = subset::select(policy, bank, rng);
                ordering::arrange(selected, &[], options.placement, rng)
            }
        };

        let page = location
            .page()
            .or(persisted.page)
            .unwrap_or(NonZeroUsize::MIN);
        let page_size = location
            .page_size()
            .or(persisted.page_size)
            .unwrap_or(NonZeroUsize::MIN);
        let pagination = Pagination::new(arrangement.questions.len(), page, page_size);

        let state = if arrangement.reshuffled {
            SessionState::fresh(arrangement.order, pagination.page(), page_size)
        } else {
            let answers = sanitize_answers(&arrangement.questions, persisted.answers);
            SessionState::from_persisted(
                arrangement.order,
                answers,
                persisted.revealed,
                pagination.page(),
                page_size,
            )
        };

        Self {
            questions: arrangement.questions,
            location: location.with_pagination(state.page(), state.page_size()),
            state,
            policy,
            phase: Phase::Active,
            reset_pending: false,
            clock: options.clock,
            report: None,
            reshuffled: arrangement.reshuffled,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn policy(&self) -> SubsetPolicy {
        self.policy
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current view location with `page`/`perPage` kept in sync.
    #[must_use]
    pub fn location(&self) -> &ViewLocation {
        &self.location
    }

    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Results, available once submitted.
    #[must_use]
    pub fn report(&self) -> Option<&ResultReport> {
        self.report.as_ref()
    }

    /// True when initialization drew a new order instead of restoring one.
    #[must_use]
    pub fn reshuffled(&self) -> bool {
        self.reshuffled
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.questions.len(),
            self.state.page(),
            self.state.page_size(),
        )
    }

    /// Snapshot of the current page for rendering.
    #[must_use]
    pub fn page_view(&self) -> PageView {
        PageView::build(
            &self.questions,
            &self.state,
            &self.pagination(),
            self.reset_pending,
        )
    }

    /// Apply one user action.
    ///
    /// Once submitted, only the reset actions are accepted.
    pub fn apply(&mut self, action: QuizAction) -> Effect {
        let reset_action = matches!(
            action,
            QuizAction::RequestReset | QuizAction::CancelReset | QuizAction::ConfirmReset
        );
        if self.phase == Phase::Submitted && !reset_action {
            return Effect::Ignored;
        }

        match action {
            QuizAction::SelectChoice { position, key } => self.select(position, key),
            QuizAction::Reveal { position } => {
                if self.state.reveal(position) {
                    Effect::Persist
                } else {
                    Effect::Ignored
                }
            }
            QuizAction::PrevPage => self.navigate(Pagination::prev),
            QuizAction::NextPage => self.navigate(Pagination::next),
            QuizAction::GoToPage(page) => self.navigate(|p| p.go_to(page)),
            QuizAction::SetPageSize(page_size) => {
                if page_size == self.state.page_size() && self.state.page() == NonZeroUsize::MIN
                {
                    return Effect::Ignored;
                }
                let mut pagination = self.pagination();
                pagination.set_page_size(page_size);
                self.sync_pagination(&pagination);
                Effect::Persist
            }
            QuizAction::SetSubsetPolicy(policy) => Effect::Reinitialize { policy },
            QuizAction::Submit => self.submit(),
            QuizAction::RequestReset => self.set_reset_pending(true),
            QuizAction::CancelReset => self.set_reset_pending(false),
            QuizAction::ConfirmReset => {
                if self.reset_pending {
                    self.reset_pending = false;
                    Effect::Reset
                } else {
                    Effect::Ignored
                }
            }
        }
    }

    fn select(&mut self, position: usize, key: ChoiceKey) -> Effect {
        let known = self
            .questions
            .get(position)
            .is_some_and(|q| q.has_option(&key));
        if known && self.state.select(position, key) {
            Effect::Persist
        } else {
            Effect::Ignored
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Pagination) -> bool) -> Effect {
        let mut pagination = self.pagination();
        if !step(&mut pagination) {
            return Effect::Ignored;
        }
        self.sync_pagination(&pagination);
        Effect::Persist
    }

    fn sync_pagination(&mut self, pagination: &Pagination) {
        self.state.set_page(pagination.page());
        self.state.set_page_size(pagination.page_size());
        self.location = self
            .location
            .with_pagination(pagination.page(), pagination.page_size());
    }

    fn submit(&mut self) -> Effect {
        if !self.pagination().can_submit() {
            return Effect::Ignored;
        }
        self.phase = Phase::Submitted;
        self.report = Some(ResultReport::build(
            &self.questions,
            &self.state,
            self.clock.now(),
        ));
        Effect::Persist
    }

    fn set_reset_pending(&mut self, pending: bool) -> Effect {
        if self.reset_pending == pending {
            return Effect::Ignored;
        }
        self.reset_pending = pending;
        Effect::ViewOnly
    }
}

fn sanitize_answers(questions: &[Question], answers: Vec<Option<ChoiceKey>>) -> Vec<Option<ChoiceKey>> {
    answers
        .into_iter()
        .enumerate()
        .map(|(position, answer)| {
            answer.filter(|key| questions.get(position).is_some_and(|q| q.has_option(key)))
        })
        .collect()
}
