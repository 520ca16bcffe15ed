//! Quiz orchestration: runs `QuizSession` transitions and carries out the
//! effects they ask for (bank loading, persistence, rebuilds).

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::location::ViewLocation;
use quiz_core::ordering::UnmatchedPlacement;
use quiz_core::session::{Effect, QuizAction, QuizSession, SessionOptions};
use quiz_core::subset::SubsetPolicy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::Storage;

use crate::Clock;
use crate::bank::{BankLoader, BankSource};
use crate::error::{QuizServicesError, SessionError};
use crate::progress_store::{ProgressStore, StorageKeys};

/// Runtime settings for `QuizService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub bank: BankSource,
    pub placement: UnmatchedPlacement,
    pub keys: StorageKeys,
}

impl QuizConfig {
    #[must_use]
    pub fn new(bank: BankSource) -> Self {
        Self {
            bank,
            placement: UnmatchedPlacement::default(),
            keys: StorageKeys::default(),
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: UnmatchedPlacement) -> Self {
        self.placement = placement;
        self
    }
}

#[derive(Clone)]
pub struct QuizService {
    config: QuizConfig,
    clock: Clock,
    loader: BankLoader,
    store: ProgressStore,
    rng: Arc<Mutex<StdRng>>,
}

impl QuizService {
    #[must_use]
    pub fn new(storage: &Storage, config: QuizConfig, clock: Clock) -> Self {
        Self::with_rng(storage, config, clock, StdRng::from_os_rng())
    }

    /// Same as `new` but with a caller-supplied generator, for reproducible
    /// shuffles.
    #[must_use]
    pub fn with_rng(storage: &Storage, config: QuizConfig, clock: Clock, rng: StdRng) -> Self {
        let store = ProgressStore::new(Arc::clone(&storage.kv), config.keys.clone());
        Self {
            config,
            clock,
            loader: BankLoader::new(),
            store,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Build a service backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: QuizConfig,
        clock: Clock,
    ) -> Result<Self, QuizServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, config, clock))
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Load the bank and saved progress and build the running session.
    ///
    /// The resulting state (including a freshly drawn order) is written back
    /// before the session is handed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the bank cannot be loaded and
    /// `SessionError::Storage` if the initial save fails.
    pub async fn start(&self, location: &ViewLocation) -> Result<QuizSession, SessionError> {
        let bank = self.loader.load(&self.config.bank).await?;
        let policy = self.store.load_policy().await;
        let persisted = self.store.load().await;

        let options = SessionOptions {
            placement: self.config.placement,
            clock: self.clock,
        };
        let session = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            QuizSession::initialize(bank, persisted, policy, location, options, &mut *rng)
        };

        if session.reshuffled() {
            tracing::debug!(questions = session.questions().len(), %policy, "drew a new question order");
        }
        self.store.save(session.state()).await?;
        tracing::info!(
            questions = session.questions().len(),
            page = session.state().page().get(),
            per_page = session.state().page_size().get(),
            "quiz started"
        );
        Ok(session)
    }

    /// Apply `action` to `session` and carry out the resulting effect.
    ///
    /// Rebuilding effects replace `session` in place.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if persistence or a rebuild fails. The
    /// in-memory transition has already happened at that point.
    pub async fn dispatch(
        &self,
        session: &mut QuizSession,
        action: QuizAction,
    ) -> Result<Effect, SessionError> {
        let effect = session.apply(action);
        match effect {
            Effect::Ignored | Effect::ViewOnly => {}
            Effect::Persist => {
                self.store.save(session.state()).await?;
                if let Some(report) = session.report() {
                    tracing::info!(
                        correct = report.score.correct,
                        total = report.score.total,
                        "quiz submitted"
                    );
                }
            }
            Effect::Reinitialize { policy } => {
                let location = session.location().clone();
                *session = self.reinitialize(policy, &location).await?;
            }
            Effect::Reset => {
                *session = self.reset(session.location()).await?;
            }
        }
        Ok(effect)
    }

    /// Store a new subset policy, drop all progress and start over at
    /// `location`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage or the bank fails.
    pub async fn reinitialize(
        &self,
        policy: SubsetPolicy,
        location: &ViewLocation,
    ) -> Result<QuizSession, SessionError> {
        self.store.save_policy(policy).await?;
        self.store.clear_progress().await?;
        tracing::info!(%policy, "subset policy changed, progress cleared");
        self.start(location).await
    }

    /// Erase everything and start over on page 1 with one question per page
    /// and every question in the bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage or the bank fails.
    pub async fn reset(&self, location: &ViewLocation) -> Result<QuizSession, SessionError> {
        self.clear_saved().await?;
        let location = location.with_pagination(NonZeroUsize::MIN, NonZeroUsize::MIN);
        self.start(&location).await
    }

    /// Remove saved progress and the subset policy without starting a
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if a delete fails.
    pub async fn clear_saved(&self) -> Result<(), SessionError> {
        self.store.clear_all().await?;
        tracing::info!("quiz progress reset");
        Ok(())
    }
}
