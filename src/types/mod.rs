//! Core data types shared across the assistant.
//!
//! - `Utterance`: one line of user input with its normalized form
//! - `ResultSet`: columns and rows returned by the data store
//! - `ChatError`: error type for every fallible operation
//! - `Result`: convenient result type alias

pub mod error;
pub mod result;
pub mod result_set;
pub mod utterance;

pub use error::ChatError;
pub use result::Result;
pub use result_set::{ResultSet, Value};
pub use utterance::Utterance;
