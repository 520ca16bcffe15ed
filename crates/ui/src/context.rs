use std::sync::Arc;

use quiz_core::location::ViewLocation;
use services::QuizService;

pub trait UiApp: Send + Sync {
    fn quiz_service(&self) -> Arc<QuizService>;

    /// Location the quiz opens at; its `page`/`perPage` override saved
    /// pagination.
    fn initial_location(&self) -> ViewLocation;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_service: Arc<QuizService>,
    initial_location: ViewLocation,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_service: app.quiz_service(),
            initial_location: app.initial_location(),
        }
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }

    #[must_use]
    pub fn initial_location(&self) -> ViewLocation {
        self.initial_location.clone()
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
