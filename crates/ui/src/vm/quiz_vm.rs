use quiz_core::location::ViewLocation;
use quiz_core::session::{Effect, PageView, Phase, QuizAction, QuizSession, ResultReport};
use quiz_core::subset::SubsetPolicy;
use services::{QuizService, SessionError};

use crate::views::ViewError;

/// UI-side handle on the running session.
#[derive(Clone, Debug)]
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn page(&self) -> PageView {
        self.session.page_view()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    #[must_use]
    pub fn policy(&self) -> SubsetPolicy {
        self.session.policy()
    }

    #[must_use]
    pub fn location(&self) -> &ViewLocation {
        self.session.location()
    }

    #[must_use]
    pub fn report(&self) -> Option<&ResultReport> {
        self.session.report()
    }

    /// Run `action` through the service. The session is updated even when
    /// persisting fails.
    ///
    /// # Errors
    ///
    /// Returns the `ViewError` matching the service failure.
    pub async fn dispatch(
        &mut self,
        service: &QuizService,
        action: QuizAction,
    ) -> Result<Effect, ViewError> {
        service
            .dispatch(&mut self.session, action)
            .await
            .map_err(map_session_error)
    }
}

/// True for actions that rebuild the whole session.
#[must_use]
pub fn rebuilds_session(action: &QuizAction) -> bool {
    matches!(
        action,
        QuizAction::SetSubsetPolicy(_) | QuizAction::ConfirmReset
    )
}

/// # Errors
///
/// Returns `ViewError::BankUnavailable` when the question bank cannot be
/// loaded and `ViewError::StorageUnavailable` when progress cannot be saved.
pub async fn start_quiz(
    service: &QuizService,
    location: &ViewLocation,
) -> Result<QuizVm, ViewError> {
    service
        .start(location)
        .await
        .map(QuizVm::new)
        .map_err(map_session_error)
}

fn map_session_error(err: SessionError) -> ViewError {
    match err {
        SessionError::Bank(_) => ViewError::BankUnavailable,
        SessionError::Storage(_) => ViewError::StorageUnavailable,
        _ => ViewError::Unknown,
    }
}
