//! Field values and the form state that tracks them.
//!
//! [`FormState`] owns the current [`FormValues`], the set of touched fields
//! and the last validation errors. It never decides which rules apply: the
//! caller passes the active [`Schema`] to every operation that validates.
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, btree_map},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// A single field value: free text or a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the value as text, formatting numbers the way they are displayed.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    /// Returns the numeric value, parsing text when needed.
    ///
    /// `None` for text that is not a number and for `NaN`.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Number(number) => *number,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        (!number.is_nan()).then_some(number)
    }

    /// `true` for empty (or whitespace only) text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Flat mapping from field name to value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a FormValues {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// First validation message per failing field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Field names with an error, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

/// Values, touched tracking and errors of a single form.
#[derive(Debug, Clone)]
pub struct FormState {
    values: FormValues,
    touched: BTreeSet<String>,
    errors: FieldErrors,
    submitting: bool,
}

impl FormState {
    pub fn new(initial_values: FormValues) -> Self {
        Self {
            values: initial_values,
            touched: BTreeSet::new(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Updates a value and re-runs `schema` so errors track the edit.
    pub fn set_value(&mut self, name: &str, value: FieldValue, schema: &Schema) {
        self.values.insert(name, value);
        self.revalidate(schema);
    }

    /// Marks a field as touched (blurred), which makes its error visible.
    pub fn touch(&mut self, name: &str, schema: &Schema) {
        self.touched.insert(name.to_string());
        self.revalidate(schema);
    }

    /// Replaces the touched set. An empty iterator clears all highlighting.
    pub fn set_touched<I, S>(&mut self, touched: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.touched = touched.into_iter().map(Into::into).collect();
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// The error of `name`, only once the field has been touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.error(name)
        } else {
            None
        }
    }

    /// Runs `schema` against the current values and stores the outcome.
    pub fn validate(&mut self, schema: &Schema) -> Result<(), FieldErrors> {
        let result = schema.validate(&self.values);
        self.errors = match &result {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors.clone(),
        };
        result
    }

    /// Recomputes the stored errors, discarding the outcome.
    pub fn revalidate(&mut self, schema: &Schema) {
        let _ = self.validate(schema);
    }

    /// Handles a submit intent: touches every field of `schema`, then
    /// validates. Returns a snapshot of the values on success.
    pub fn submit_intent(&mut self, schema: &Schema) -> Result<FormValues, FieldErrors> {
        for name in schema.field_names() {
            self.touched.insert(name.to_string());
        }
        self.validate(schema)?;
        Ok(self.values.clone())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRule;

    fn title_schema() -> Schema {
        Schema::new().field("title", FieldRule::string().min(5).required())
    }

    #[test]
    fn number_parses_from_text() {
        assert_eq!(FieldValue::from("50").as_number(), Some(50.0));
        assert_eq!(FieldValue::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(FieldValue::from(50).to_string(), "50");
        assert_eq!(FieldValue::from(2.5).as_text(), "2.5");
    }

    #[test]
    fn values_serialize_as_flat_object() {
        let values = FormValues::new().with("amount", 50).with("title", "Rent");
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, serde_json::json!({"amount": 50.0, "title": "Rent"}));
    }

    #[test]
    fn errors_stay_hidden_until_touched() {
        let schema = title_schema();
        let mut form = FormState::new(FormValues::new().with("title", ""));
        form.set_value("title", "abc".into(), &schema);

        assert!(form.error("title").is_some());
        assert_eq!(form.visible_error("title"), None);

        form.touch("title", &schema);
        assert_eq!(
            form.visible_error("title"),
            Some("title must be at least 5 characters")
        );
    }

    #[test]
    fn submit_intent_touches_schema_fields_only() {
        let schema = title_schema();
        let mut form = FormState::new(
            FormValues::new()
                .with("title", "")
                .with("details", ""),
        );

        let errors = form.submit_intent(&schema).unwrap_err();
        assert!(errors.contains("title"));
        assert!(form.is_touched("title"));
        assert!(!form.is_touched("details"));
    }

    #[test]
    fn set_touched_empty_clears_highlighting() {
        let schema = title_schema();
        let mut form = FormState::new(FormValues::new().with("title", ""));
        let _ = form.submit_intent(&schema);
        assert!(form.visible_error("title").is_some());

        form.set_touched(Vec::<String>::new());
        assert_eq!(form.visible_error("title"), None);
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "first");
        errors.insert("title", "second");
        assert_eq!(errors.get("title"), Some("first"));
        assert_eq!(errors.len(), 1);
    }
}
