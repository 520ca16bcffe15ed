#![forbid(unsafe_code)]

pub mod location;
pub mod model;
pub mod ordering;
pub mod pagination;
pub mod scoring;
pub mod session;
pub mod subset;
pub mod time;

pub use time::Clock;
