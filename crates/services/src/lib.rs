#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod progress_store;
pub mod quiz;

pub use quiz_core::Clock;

pub use bank::{BankLoader, BankSource};
pub use error::{BankError, QuizServicesError, SessionError};
pub use progress_store::{ProgressStore, StorageKeys};
pub use quiz::{QuizConfig, QuizService};
