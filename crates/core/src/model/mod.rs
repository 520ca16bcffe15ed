mod ids;
mod progress;
mod question;

pub use ids::{ChoiceKey, EnumerationId, ParseIdError};
pub use progress::{PersistedProgress, SessionState};
pub use question::{Choice, Question, QuestionError, QuestionRecord, filter_records};
