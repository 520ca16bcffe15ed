mod options;
mod quiz_vm;
mod time_fmt;

pub use options::{page_size_options, parse_page_size, subset_options};
pub use quiz_vm::{QuizVm, rebuilds_session, start_quiz};
pub use time_fmt::format_datetime;
