use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use stepper::{
    FieldRule, FieldSpec, FieldValue, FormValues, SUBMIT_FAILED_MESSAGE, Schema, SelectOption,
    StepDefinition, StepWizard, SubmitError, Transition,
};
use tokio::sync::oneshot;

const CATEGORIES: [&str; 9] = [
    "Grocery",
    "Health",
    "Bills",
    "Fees",
    "Rent",
    "Entertainment",
    "Repairing and Maintainence",
    "Fuel",
    "Other",
];

fn transaction_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "Enter Transaction Title and Type",
            Schema::new()
                .field(
                    "title",
                    FieldRule::string()
                        .min(5)
                        .max_with(50, "Maximum 50 characters are allowed")
                        .required(),
                )
                .field("category", FieldRule::string().one_of(CATEGORIES).required()),
        )
        .field(FieldSpec::text("title", "Transaction Title"))
        .field(FieldSpec::select(
            "category",
            "Transaction Type",
            CATEGORIES
                .iter()
                .map(|category| SelectOption::new(*category, *category))
                .collect(),
        )),
        StepDefinition::new(
            "Enter Transaction Amount and Type",
            Schema::new()
                .field("amount", FieldRule::number().min(1.0).required())
                .field(
                    "type",
                    FieldRule::string().one_of(["Income", "Expense"]).required(),
                ),
        )
        .field(FieldSpec::number("amount", "Transaction Amount"))
        .field(FieldSpec::select(
            "type",
            "Transaction Type",
            vec![
                SelectOption::new("Income", "+ Income"),
                SelectOption::new("Expense", "- Expense"),
            ],
        )),
        StepDefinition::new(
            "Enter Transaction Detail",
            Schema::new().field("details", FieldRule::string()),
        )
        .field(FieldSpec::multiline("details", "Transaction Details")),
    ]
}

fn initial_values() -> FormValues {
    FormValues::new()
        .with("title", "")
        .with("category", "")
        .with("amount", 0)
        .with("type", "")
        .with("details", "")
}

/// Records every call of the completion callback.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<FormValues>>>,
}

impl Recorder {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> Option<FormValues> {
        self.last.lock().unwrap().clone()
    }

    fn record(&self, values: FormValues) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(values);
    }
}

fn wizard_ok(recorder: &Recorder) -> StepWizard {
    let recorder = recorder.clone();
    StepWizard::new(initial_values(), transaction_steps(), move |values| {
        recorder.record(values);
        async { Ok::<(), SubmitError>(()) }
    })
}

fn fill_first_step(wizard: &mut StepWizard) {
    assert!(wizard.set_value("title", "Groceries Jan".into()));
    assert!(wizard.set_value("category", "Grocery".into()));
}

fn fill_second_step(wizard: &mut StepWizard) {
    assert!(wizard.set_value("amount", FieldValue::Number(50.0)));
    assert!(wizard.set_value("type", "Expense".into()));
}

#[tokio::test]
async fn full_transaction_scenario_completes() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    assert_eq!(wizard.active_index(), 0);
    assert!(!wizard.is_completed());

    fill_first_step(&mut wizard);
    assert!(matches!(
        wizard.submit(),
        Transition::Advanced { from: 0, to: 1 }
    ));

    fill_second_step(&mut wizard);
    assert!(matches!(
        wizard.submit(),
        Transition::Advanced { from: 1, to: 2 }
    ));
    assert_eq!(recorder.calls(), 0);

    assert!(matches!(
        wizard.submit_and_wait().await,
        Transition::Completed
    ));
    assert!(wizard.is_completed());
    assert_eq!(wizard.active_index(), 2);
    assert_eq!(recorder.calls(), 1);

    let expected = FormValues::new()
        .with("title", "Groceries Jan")
        .with("category", "Grocery")
        .with("amount", 50)
        .with("type", "Expense")
        .with("details", "");
    assert_eq!(recorder.last(), Some(expected));
    assert!(wizard.step_markers().all(|marker| marker.complete));
}

#[tokio::test]
async fn short_title_keeps_first_step() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    wizard.set_value("title", "abcd".into());
    wizard.set_value("category", "Grocery".into());

    let Transition::Invalid(errors) = wizard.submit() else {
        panic!("expected invalid transition");
    };
    assert_eq!(wizard.active_index(), 0);
    assert_eq!(
        errors.get("title"),
        Some("title must be at least 5 characters")
    );
    assert_eq!(
        wizard.form().visible_error("title"),
        Some("title must be at least 5 characters")
    );
    assert!(!errors.contains("category"));
}

#[tokio::test]
async fn invalid_data_never_moves_any_step() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);

    assert!(matches!(wizard.submit(), Transition::Invalid(_)));
    assert_eq!(wizard.active_index(), 0);

    fill_first_step(&mut wizard);
    let _ = wizard.submit();
    wizard.set_value("amount", FieldValue::Number(0.0));
    let Transition::Invalid(errors) = wizard.submit() else {
        panic!("expected invalid transition");
    };
    assert_eq!(wizard.active_index(), 1);
    assert_eq!(
        errors.get("amount"),
        Some("amount must be greater than or equal to 1")
    );
    assert_eq!(errors.get("type"), Some("type is a required field"));
    assert_eq!(recorder.calls(), 0);
}

#[tokio::test]
async fn advancing_clears_touched_state() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    fill_first_step(&mut wizard);
    let _ = wizard.submit();

    assert!(!wizard.form().is_touched("title"));
    assert!(!wizard.form().is_touched("amount"));
    assert_eq!(wizard.form().visible_error("amount"), None);
    assert_eq!(wizard.form().visible_error("type"), None);
}

#[tokio::test]
async fn only_active_step_rules_apply() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    fill_first_step(&mut wizard);
    let _ = wizard.submit();

    // Step one fields turn invalid, but only step two rules are in force.
    wizard.set_value("title", "x".into());
    fill_second_step(&mut wizard);
    assert!(wizard.form().error("title").is_none());
    assert!(matches!(
        wizard.submit(),
        Transition::Advanced { from: 1, to: 2 }
    ));
}

#[tokio::test]
async fn back_is_hidden_on_first_step() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    assert!(!wizard.can_go_back());
    assert!(matches!(wizard.back(), Transition::Ignored));
    assert_eq!(wizard.active_index(), 0);
}

#[tokio::test]
async fn back_steps_once_without_validating_or_clearing() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    fill_first_step(&mut wizard);
    let _ = wizard.submit();
    fill_second_step(&mut wizard);
    let _ = wizard.submit();
    assert_eq!(wizard.active_index(), 2);

    wizard.set_value("details", "weekly shop".into());
    assert!(wizard.can_go_back());
    assert!(matches!(
        wizard.back(),
        Transition::Retreated { from: 2, to: 1 }
    ));

    // Step two is left invalid, going back must not care.
    wizard.set_value("amount", FieldValue::Number(0.0));
    assert!(matches!(
        wizard.back(),
        Transition::Retreated { from: 1, to: 0 }
    ));
    assert_eq!(wizard.active_index(), 0);
    assert_eq!(
        wizard.values().get("details"),
        Some(&FieldValue::from("weekly shop"))
    );
    assert_eq!(
        wizard.values().get("title"),
        Some(&FieldValue::from("Groceries Jan"))
    );
}

#[tokio::test]
async fn completes_only_after_callback_resolves() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (release, gate) = oneshot::channel::<()>();
    let gate = Arc::new(Mutex::new(Some(gate)));

    let mut wizard = {
        let calls = calls.clone();
        StepWizard::new(initial_values(), transaction_steps(), move |_values| {
            calls.fetch_add(1, Ordering::SeqCst);
            let gate = gate.lock().unwrap().take();
            async move {
                if let Some(gate) = gate {
                    gate.await.map_err(|_| SubmitError::Aborted)?;
                }
                Ok::<(), SubmitError>(())
            }
        })
    };

    fill_first_step(&mut wizard);
    let _ = wizard.submit();
    fill_second_step(&mut wizard);
    let _ = wizard.submit();

    let Transition::Pending(pending) = wizard.submit() else {
        panic!("expected pending submission");
    };
    assert!(wizard.is_pending());
    assert!(!wizard.is_completed());
    assert!(!wizard.submit_enabled());
    assert!(!wizard.back_enabled());
    assert_eq!(wizard.submit_label(), "Submitting");

    assert!(matches!(wizard.submit(), Transition::Ignored));
    assert!(matches!(wizard.submit(), Transition::Ignored));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let task = tokio::spawn(pending);
    release.send(()).unwrap();
    let result = task.await.unwrap();
    assert!(!wizard.is_completed());

    assert!(matches!(wizard.finish(result), Transition::Completed));
    assert!(wizard.is_completed());
    assert!(!wizard.is_pending());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn completed_wizard_ignores_further_triggers() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    fill_first_step(&mut wizard);
    let _ = wizard.submit();
    fill_second_step(&mut wizard);
    let _ = wizard.submit();
    let _ = wizard.submit_and_wait().await;

    assert!(matches!(wizard.submit(), Transition::Ignored));
    assert!(matches!(wizard.back(), Transition::Ignored));
    assert!(!wizard.set_value("details", "late edit".into()));
    assert_eq!(recorder.calls(), 1);
}

#[tokio::test]
async fn rejected_submission_returns_to_idle() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut wizard = {
        let attempts = attempts.clone();
        StepWizard::new(initial_values(), transaction_steps(), move |_values| {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(SubmitError::Rejected("backend down".to_string()))
                } else {
                    Ok(())
                }
            }
        })
    };
    fill_first_step(&mut wizard);
    let _ = wizard.submit();
    fill_second_step(&mut wizard);
    let _ = wizard.submit();

    let Transition::Failed(message) = wizard.submit_and_wait().await else {
        panic!("expected failed submission");
    };
    assert_eq!(message, SUBMIT_FAILED_MESSAGE);
    assert_eq!(wizard.submit_error(), Some(SUBMIT_FAILED_MESSAGE));
    assert!(!wizard.is_pending());
    assert!(!wizard.is_completed());
    assert_eq!(wizard.active_index(), 2);
    assert_eq!(
        wizard.values().get("title"),
        Some(&FieldValue::from("Groceries Jan"))
    );

    assert!(matches!(
        wizard.submit_and_wait().await,
        Transition::Completed
    ));
    assert_eq!(wizard.submit_error(), None);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn step_markers_follow_active_index() {
    let recorder = Recorder::default();
    let mut wizard = wizard_ok(&recorder);
    fill_first_step(&mut wizard);
    let _ = wizard.submit();

    let markers: Vec<_> = wizard
        .step_markers()
        .map(|marker| (marker.complete, marker.active))
        .collect();
    assert_eq!(markers, vec![(true, false), (false, true), (false, false)]);
    assert_eq!(wizard.submit_label(), "Next");
}

#[tokio::test]
async fn single_step_wizard_submits_immediately() {
    let recorder = Recorder::default();
    let mut wizard = {
        let recorder = recorder.clone();
        StepWizard::new(
            FormValues::new().with("details", ""),
            vec![StepDefinition::new(
                "Details",
                Schema::new().field("details", FieldRule::string()),
            )],
            move |values| {
                recorder.record(values);
                async { Ok::<(), SubmitError>(()) }
            },
        )
    };
    assert_eq!(wizard.submit_label(), "Submit");
    assert!(!wizard.can_go_back());
    assert!(matches!(
        wizard.submit_and_wait().await,
        Transition::Completed
    ));
    assert_eq!(recorder.calls(), 1);
}
