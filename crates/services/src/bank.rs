//! Question bank loading: a JSON array of question records read from disk or
//! fetched over HTTP.

use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{Question, QuestionRecord, filter_records};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::BankError;

/// Where the question bank comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    File(PathBuf),
    Remote(Url),
}

impl BankSource {
    /// `http(s)://` URLs are fetched, `file://` URLs and anything else are
    /// treated as a local path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_or_else(|()| Self::File(PathBuf::from(trimmed)), Self::File),
            _ => Self::File(PathBuf::from(trimmed)),
        }
    }
}

impl fmt::Display for BankSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Clone, Default)]
pub struct BankLoader {
    client: Client,
}

impl BankLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Load and filter the bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError` when the source cannot be read or is not a JSON
    /// array. Individual bad records are dropped, not reported as errors.
    pub async fn load(&self, source: &BankSource) -> Result<Vec<Question>, BankError> {
        let raw = match source {
            BankSource::File(path) => tokio::fs::read_to_string(path).await?,
            BankSource::Remote(url) => {
                let response = self.client.get(url.clone()).send().await?;
                if !response.status().is_success() {
                    return Err(BankError::HttpStatus(response.status()));
                }
                response.text().await?
            }
        };

        let questions = parse_bank(&raw)?;
        tracing::info!(%source, questions = questions.len(), "loaded question bank");
        Ok(questions)
    }
}

/// Decode a bank document, keeping only records that are usable questions.
///
/// Records are decoded one by one so a single malformed entry does not
/// poison the rest of the bank.
///
/// # Errors
///
/// Returns `BankError::Json` for unparseable input and
/// `BankError::NotAnArray` when the top-level value is not an array.
pub fn parse_bank(raw: &str) -> Result<Vec<Question>, BankError> {
    let Value::Array(items) = serde_json::from_str::<Value>(raw)? else {
        return Err(BankError::NotAnArray);
    };

    let records = items.into_iter().enumerate().filter_map(|(index, item)| {
        serde_json::from_value::<QuestionRecord>(item)
            .map_err(|err| tracing::warn!(index, %err, "skipping undecodable question record"))
            .ok()
    });

    let (questions, rejected) = filter_records(records);
    for err in &rejected {
        tracing::warn!(%err, "skipping invalid question record");
    }
    if questions.is_empty() {
        tracing::warn!("question bank has no usable questions");
    }
    Ok(questions)
}
