//! Errors a completion callback can report back to the wizard.
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission aborted before completing")]
    Aborted,
}
