//! Durable quiz progress on top of a key-value repository.
//!
//! Progress is one JSON record; the subset policy lives under its own key so
//! that it survives a progress wipe.

use std::num::NonZeroUsize;
use std::sync::Arc;

use quiz_core::model::{ChoiceKey, EnumerationId, PersistedProgress, SessionState};
use quiz_core::subset::SubsetPolicy;
use serde::Serialize;
use serde_json::{Map, Value};
use storage::repository::{KeyValueRepository, StorageError};

pub const PROGRESS_KEY: &str = "quiz-progress-v1";
pub const SUBSET_POLICY_KEY: &str = "quiz-total-questions";

/// Keys the store writes under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub progress: String,
    pub subset_policy: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            progress: PROGRESS_KEY.to_string(),
            subset_policy: SUBSET_POLICY_KEY.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn KeyValueRepository>,
    keys: StorageKeys,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn KeyValueRepository>, keys: StorageKeys) -> Self {
        Self { repo, keys }
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Load whatever progress survived. Never fails: read errors and bad
    /// data degrade to the default record.
    pub async fn load(&self) -> PersistedProgress {
        match self.repo.get_value(&self.keys.progress).await {
            Ok(Some(raw)) => decode_progress(&raw),
            Ok(None) => PersistedProgress::default(),
            Err(err) => {
                tracing::warn!(%err, key = %self.keys.progress, "progress unreadable, starting fresh");
                PersistedProgress::default()
            }
        }
    }

    /// Write the full session state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save(&self, state: &SessionState) -> Result<(), StorageError> {
        let raw = encode_progress(state)?;
        self.repo.put_value(&self.keys.progress, &raw).await?;
        tracing::debug!(
            page = state.page().get(),
            per_page = state.page_size().get(),
            answered = state.answered_count(),
            "saved progress"
        );
        Ok(())
    }

    /// Stored subset policy, `All` when absent or unreadable.
    pub async fn load_policy(&self) -> SubsetPolicy {
        match self.repo.get_value(&self.keys.subset_policy).await {
            Ok(raw) => raw
                .as_deref()
                .map_or(SubsetPolicy::All, SubsetPolicy::parse_lenient),
            Err(err) => {
                tracing::warn!(%err, key = %self.keys.subset_policy, "subset policy unreadable, using all");
                SubsetPolicy::All
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn save_policy(&self, policy: SubsetPolicy) -> Result<(), StorageError> {
        self.repo
            .put_value(&self.keys.subset_policy, &policy.to_string())
            .await
    }

    /// Remove the progress record only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear_progress(&self) -> Result<(), StorageError> {
        self.repo.remove_value(&self.keys.progress).await
    }

    /// Remove progress and the subset policy.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either delete fails.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.clear_progress().await?;
        self.repo.remove_value(&self.keys.subset_policy).await
    }
}

//
// ─── CODEC ─────────────────────────────────────────────────────────────────────
//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRecord<'a> {
    answers: &'a [Option<ChoiceKey>],
    revealed: &'a [bool],
    page: usize,
    per_page: usize,
    question_order: &'a [EnumerationId],
}

/// Encode `state` as the stored JSON record.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress(state: &SessionState) -> Result<String, StorageError> {
    let record = ProgressRecord {
        answers: state.answers(),
        revealed: state.revealed(),
        page: state.page().get(),
        per_page: state.page_size().get(),
        question_order: state.ordered_enumerations(),
    };
    serde_json::to_string(&record).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode a stored record field by field. Missing or malformed fields are
/// left at their defaults, and an array with any wrongly typed element is
/// dropped whole; input that is not a JSON object yields the
/// default record.
#[must_use]
pub fn decode_progress(raw: &str) -> PersistedProgress {
    let fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) | Err(_) => {
            tracing::warn!("stored progress is not a JSON object, ignoring it");
            return PersistedProgress::default();
        }
    };

    PersistedProgress {
        order: decode_order(&fields),
        answers: array(&fields, "answers")
            .and_then(|items| items.iter().map(decode_answer).collect::<Option<Vec<_>>>())
            .unwrap_or_default(),
        revealed: array(&fields, "revealed")
            .and_then(|items| items.iter().map(Value::as_bool).collect::<Option<Vec<_>>>())
            .unwrap_or_default(),
        page: positive(&fields, "page"),
        page_size: positive(&fields, "perPage"),
    }
}

fn array<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Vec<Value>> {
    fields.get(name).and_then(Value::as_array)
}

fn positive(fields: &Map<String, Value>, name: &str) -> Option<NonZeroUsize> {
    fields
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .and_then(NonZeroUsize::new)
}

// Outer `None` rejects the element (and with it the whole array); a blank
// string is well-typed and reads as unanswered.
fn decode_answer(value: &Value) -> Option<Option<ChoiceKey>> {
    match value {
        Value::Null => Some(None),
        Value::String(raw) => Some(ChoiceKey::new(raw.as_str()).ok()),
        _ => None,
    }
}

// Arrays are all-or-nothing: one bad element discards the field.
fn decode_order(fields: &Map<String, Value>) -> Vec<EnumerationId> {
    array(fields, "questionOrder")
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_u64().map(EnumerationId::new))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default()
}
