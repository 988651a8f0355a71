//! Request, response, and outcome types

pub mod query;
pub mod response;

pub use query::{AnswerMode, RunRequest};
pub use response::{QueryOutcome, RunResponse};
