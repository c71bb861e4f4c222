//! Multi-step form controller.
//!
//! The crate has three layers:
//!
//! - [`schema`]: declarative per-field rules ([`Schema`], [`FieldRule`]).
//! - [`form`]: values, touched tracking and errors of one form ([`FormState`]).
//! - [`wizard`]: the [`StepWizard`] that walks an ordered list of
//!   [`StepDefinition`]s, validating only the active one, and runs the
//!   completion callback behind a busy gate.
pub use error::SubmitError;
pub use form::{FieldErrors, FieldValue, FormState, FormValues};
pub use schema::{FieldRule, NumberRule, Schema, StringRule};
pub use step::{FieldKind, FieldSpec, SelectOption, StepDefinition};
pub use wizard::{PendingSubmission, SUBMIT_FAILED_MESSAGE, StepMarker, StepWizard, Transition};

mod error;
pub mod form;
pub mod schema;
mod step;
pub mod wizard;
