//! The step wizard controller.
//!
//! [`StepWizard`] sequences an ordered list of [`StepDefinition`]s over one
//! [`FormState`]. Only the active step's schema is ever validated. Submitting
//! a valid intermediate step moves forward by exactly one; submitting the last
//! step hands the values to the completion callback and returns the pending
//! [`PendingSubmission`] for the caller to drive.
//!
//! ```rust
//! use stepper::{
//!     FieldRule, FormValues, Schema, StepDefinition, StepWizard, SubmitError, Transition,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let steps = vec![
//!     StepDefinition::new("Name", Schema::new().field("name", FieldRule::string().required())),
//!     StepDefinition::new("Notes", Schema::new()),
//! ];
//! let mut wizard = StepWizard::new(
//!     FormValues::new().with("name", ""),
//!     steps,
//!     |_values| async { Ok::<(), SubmitError>(()) },
//! );
//!
//! assert!(matches!(wizard.submit(), Transition::Invalid(_)));
//! wizard.set_value("name", "Ada".into());
//! assert!(matches!(wizard.submit(), Transition::Advanced { from: 0, to: 1 }));
//! assert!(matches!(wizard.submit_and_wait().await, Transition::Completed));
//! assert!(wizard.is_completed());
//! # });
//! ```
use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    error::SubmitError,
    form::{FieldErrors, FieldValue, FormState, FormValues},
    schema::Schema,
    step::StepDefinition,
};

/// Message shown when the completion callback fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "Submission failed, please try again.";

type CompletionFuture = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send>>;
type OnComplete = Box<dyn Fn(FormValues) -> CompletionFuture + Send + Sync>;

/// The in-flight completion callback.
///
/// Await it (or spawn it) and pass its output to [`StepWizard::finish`].
#[must_use = "the wizard stays busy until the submission is finished"]
pub struct PendingSubmission {
    future: CompletionFuture,
}

impl Future for PendingSubmission {
    type Output = Result<(), SubmitError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubmission").finish_non_exhaustive()
    }
}

/// Outcome of a wizard trigger.
#[derive(Debug)]
pub enum Transition {
    /// The active step passed validation and the next one is now active.
    Advanced { from: usize, to: usize },
    /// The previous step is now active.
    Retreated { from: usize, to: usize },
    /// The active step failed validation; nothing moved.
    Invalid(FieldErrors),
    /// The last step passed validation and the completion callback started.
    Pending(PendingSubmission),
    /// The completion callback resolved successfully.
    Completed,
    /// The completion callback failed; the wizard is idle again.
    Failed(String),
    /// The trigger does not apply in the current state.
    Ignored,
}

/// Marker data for the step indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepMarker<'a> {
    pub index: usize,
    pub label: &'a str,
    pub complete: bool,
    pub active: bool,
}

pub struct StepWizard {
    steps: Vec<StepDefinition>,
    form: FormState,
    active: usize,
    completed: bool,
    submit_error: Option<String>,
    on_complete: OnComplete,
}

impl StepWizard {
    /// Binds `initial_values` to the first step's schema.
    ///
    /// `steps` must not be empty.
    pub fn new<F, Fut>(
        initial_values: FormValues,
        steps: Vec<StepDefinition>,
        on_complete: F,
    ) -> Self
    where
        F: Fn(FormValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        debug_assert!(!steps.is_empty(), "a wizard needs at least one step");
        let on_complete: OnComplete =
            Box::new(move |values| -> CompletionFuture { Box::pin(on_complete(values)) });

        let mut wizard = Self {
            steps,
            form: FormState::new(initial_values),
            active: 0,
            completed: false,
            submit_error: None,
            on_complete,
        };
        wizard.refresh_errors();
        wizard
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_step(&self) -> &StepDefinition {
        &self.steps[self.active]
    }

    /// The rule set in force: always the active step's schema.
    pub fn active_schema(&self) -> &Schema {
        self.active_step().schema()
    }

    pub fn is_last_step(&self) -> bool {
        self.active + 1 == self.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// `true` while the completion callback is in flight.
    pub fn is_pending(&self) -> bool {
        self.form.is_submitting()
    }

    fn is_idle(&self) -> bool {
        !self.is_pending() && !self.completed
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn values(&self) -> &FormValues {
        self.form.values()
    }

    /// Message of the last failed submission, cleared by the next submit.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Whether the Back control is shown at all.
    pub fn can_go_back(&self) -> bool {
        self.active > 0
    }

    /// Whether the Back control accepts input.
    pub fn back_enabled(&self) -> bool {
        self.can_go_back() && self.is_idle()
    }

    /// Whether the submit control accepts input.
    pub fn submit_enabled(&self) -> bool {
        self.is_idle()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            "Submitting"
        } else if self.is_last_step() {
            "Submit"
        } else {
            "Next"
        }
    }

    pub fn step_markers(&self) -> impl Iterator<Item = StepMarker<'_>> {
        self.steps.iter().enumerate().map(|(index, step)| StepMarker {
            index,
            label: step.label(),
            complete: index < self.active || self.completed,
            active: index == self.active,
        })
    }

    /// Edits a field. Ignored while a submission is pending or after completion.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> bool {
        if !self.is_idle() {
            return false;
        }
        let schema = self.steps[self.active].schema();
        self.form.set_value(name, value, schema);
        true
    }

    /// Marks a field as blurred so its error becomes visible.
    pub fn touch(&mut self, name: &str) {
        let schema = self.steps[self.active].schema();
        self.form.touch(name, schema);
    }

    /// Submit intent on the active step.
    pub fn submit(&mut self) -> Transition {
        if !self.is_idle() {
            tracing::debug!(
                pending = self.is_pending(),
                completed = self.completed,
                "submit ignored"
            );
            return Transition::Ignored;
        }
        self.submit_error = None;

        let schema = self.steps[self.active].schema();
        let values = match self.form.submit_intent(schema) {
            Ok(values) => values,
            Err(errors) => {
                tracing::debug!(step = self.active, errors = %errors, "step failed validation");
                return Transition::Invalid(errors);
            }
        };

        if self.is_last_step() {
            tracing::info!(step = self.active, "submitting wizard values");
            self.form.set_submitting(true);
            return Transition::Pending(PendingSubmission {
                future: (self.on_complete)(values),
            });
        }

        let from = self.active;
        self.active += 1;
        self.form.set_touched(Vec::<String>::new());
        self.refresh_errors();
        tracing::info!(from, to = self.active, "advanced to next step");
        Transition::Advanced {
            from,
            to: self.active,
        }
    }

    /// Applies the outcome of a [`PendingSubmission`].
    pub fn finish(&mut self, result: Result<(), SubmitError>) -> Transition {
        if !self.is_pending() {
            return Transition::Ignored;
        }
        self.form.set_submitting(false);

        match result {
            Ok(()) => {
                self.completed = true;
                tracing::info!(steps = self.steps.len(), "wizard completed");
                Transition::Completed
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.submit_error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                Transition::Failed(SUBMIT_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Submits and, on the last step, awaits the callback before finishing.
    pub async fn submit_and_wait(&mut self) -> Transition {
        match self.submit() {
            Transition::Pending(pending) => {
                let result = pending.await;
                self.finish(result)
            }
            other => other,
        }
    }

    /// Moves to the previous step without validating. Values are kept.
    pub fn back(&mut self) -> Transition {
        if !self.back_enabled() {
            return Transition::Ignored;
        }
        let from = self.active;
        self.active -= 1;
        self.refresh_errors();
        tracing::info!(from, to = self.active, "returned to previous step");
        Transition::Retreated {
            from,
            to: self.active,
        }
    }

    fn refresh_errors(&mut self) {
        let schema = self.steps[self.active].schema();
        self.form.revalidate(schema);
    }
}

impl fmt::Debug for StepWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepWizard")
            .field("steps", &self.steps)
            .field("form", &self.form)
            .field("active", &self.active)
            .field("completed", &self.completed)
            .field("submit_error", &self.submit_error)
            .finish_non_exhaustive()
    }
}
