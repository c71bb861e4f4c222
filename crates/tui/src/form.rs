//! The transaction-entry form: its steps, rules and completion callback.
use std::time::Duration;

use stepper::{
    FieldRule, FieldSpec, FormValues, Schema, SelectOption, StepDefinition, StepWizard,
    SubmitError,
};

pub const CATEGORIES: [&str; 9] = [
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

pub const TRANSACTION_TYPES: [(&str, &str); 2] = [("Income", "+ Income"), ("Expense", "- Expense")];

pub fn initial_values() -> FormValues {
    FormValues::new()
        .with("title", "")
        .with("category", "")
        .with("amount", 0)
        .with("type", "")
        .with("details", "")
}

pub fn steps() -> Vec<StepDefinition> {
    vec![title_step(), amount_step(), details_step()]
}

fn title_step() -> StepDefinition {
    let schema = Schema::new()
        .field(
            "title",
            FieldRule::string()
                .min(5)
                .max_with(50, "Maximum 50 characters are allowed")
                .required(),
        )
        .field("category", FieldRule::string().one_of(CATEGORIES).required());

    let categories = CATEGORIES
        .iter()
        .map(|category| SelectOption::new(*category, *category))
        .collect();

    StepDefinition::new("Enter Transaction Title and Type", schema)
        .field(FieldSpec::text("title", "Transaction Title"))
        .field(FieldSpec::select("category", "Transaction Type", categories))
}

fn amount_step() -> StepDefinition {
    let schema = Schema::new()
        .field("amount", FieldRule::number().min(1.0).required())
        .field(
            "type",
            FieldRule::string()
                .one_of(TRANSACTION_TYPES.iter().map(|(value, _)| *value))
                .required(),
        );

    let types = TRANSACTION_TYPES
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    StepDefinition::new("Enter Transaction Amount and Type", schema)
        .field(FieldSpec::number("amount", "Transaction Amount"))
        .field(FieldSpec::select("type", "Transaction Type", types))
}

fn details_step() -> StepDefinition {
    StepDefinition::new(
        "Enter Transaction Detail",
        Schema::new().field("details", FieldRule::string()),
    )
    .field(FieldSpec::multiline("details", "Transaction Details"))
}

/// Simulated submit: waits `delay`, then logs the values.
pub async fn submit_transaction(values: FormValues, delay: Duration) -> Result<(), SubmitError> {
    tokio::time::sleep(delay).await;
    let payload =
        serde_json::to_string(&values).map_err(|err| SubmitError::Rejected(err.to_string()))?;
    tracing::info!(values = %payload, "transaction submitted");
    Ok(())
}

pub fn wizard(delay: Duration) -> StepWizard {
    StepWizard::new(initial_values(), steps(), move |values| {
        submit_transaction(values, delay)
    })
}
