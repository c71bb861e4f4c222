//! Declarative per-field validation rules.
//!
//! A [`Schema`] is an ordered list of `(field, rule)` pairs. Validating it
//! yields at most one message per field: the first failing constraint, checked
//! in the order type, required, one-of, min, max.
//!
//! ```rust
//! use stepper::{FieldRule, FormValues, Schema};
//!
//! let schema = Schema::new()
//!     .field("title", FieldRule::string().min(5).required())
//!     .field("amount", FieldRule::number().min(1.0).required());
//!
//! let values = FormValues::new().with("title", "abcd").with("amount", 50);
//! let errors = schema.validate(&values).unwrap_err();
//! assert_eq!(errors.get("title"), Some("title must be at least 5 characters"));
//! assert!(!errors.contains("amount"));
//! ```
use crate::form::{FieldErrors, FieldValue, FormValues};

/// A constraint bound plus an optional message overriding the default one.
#[derive(Clone, Debug, PartialEq)]
struct Bound<T> {
    value: T,
    message: Option<String>,
}

impl<T> Bound<T> {
    fn new(value: T, message: Option<String>) -> Self {
        Self { value, message }
    }

    fn message_or(&self, default: impl FnOnce() -> String) -> String {
        self.message.clone().unwrap_or_else(default)
    }
}

/// Constraints for a text field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringRule {
    required: Option<Bound<()>>,
    min: Option<Bound<usize>>,
    max: Option<Bound<usize>>,
    one_of: Option<Bound<Vec<String>>>,
}

impl StringRule {
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(Bound::new((), None));
        self
    }

    #[must_use]
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = Some(Bound::new((), Some(message.into())));
        self
    }

    /// Minimum length, in characters.
    #[must_use]
    pub fn min(mut self, len: usize) -> Self {
        self.min = Some(Bound::new(len, None));
        self
    }

    #[must_use]
    pub fn min_with(mut self, len: usize, message: impl Into<String>) -> Self {
        self.min = Some(Bound::new(len, Some(message.into())));
        self
    }

    /// Maximum length, in characters.
    #[must_use]
    pub fn max(mut self, len: usize) -> Self {
        self.max = Some(Bound::new(len, None));
        self
    }

    #[must_use]
    pub fn max_with(mut self, len: usize, message: impl Into<String>) -> Self {
        self.max = Some(Bound::new(len, Some(message.into())));
        self
    }

    /// Restricts the value to an enumerated set.
    #[must_use]
    pub fn one_of<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed.into_iter().map(Into::into).collect();
        self.one_of = Some(Bound::new(allowed, None));
        self
    }

    fn check(&self, path: &str, value: Option<&FieldValue>) -> Option<String> {
        let owned = value.map(FieldValue::as_text).unwrap_or_default();
        let text: &str = &owned;

        if text.is_empty() {
            return self
                .required
                .as_ref()
                .map(|bound| bound.message_or(|| required_message(path)));
        }

        if let Some(bound) = &self.one_of
            && !bound.value.iter().any(|allowed| allowed == text)
        {
            return Some(bound.message_or(|| {
                format!(
                    "{path} must be one of the following values: {}",
                    bound.value.join(", ")
                )
            }));
        }

        let len = text.chars().count();
        if let Some(bound) = &self.min
            && len < bound.value
        {
            return Some(
                bound.message_or(|| format!("{path} must be at least {} characters", bound.value)),
            );
        }
        if let Some(bound) = &self.max
            && len > bound.value
        {
            return Some(
                bound.message_or(|| format!("{path} must be at most {} characters", bound.value)),
            );
        }

        None
    }
}

/// Constraints for a numeric field. Text input is cast before checking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumberRule {
    required: Option<Bound<()>>,
    min: Option<Bound<f64>>,
}

impl NumberRule {
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(Bound::new((), None));
        self
    }

    #[must_use]
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = Some(Bound::new((), Some(message.into())));
        self
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(Bound::new(min, None));
        self
    }

    #[must_use]
    pub fn min_with(mut self, min: f64, message: impl Into<String>) -> Self {
        self.min = Some(Bound::new(min, Some(message.into())));
        self
    }

    fn check(&self, path: &str, value: Option<&FieldValue>) -> Option<String> {
        let Some(value) = value.filter(|value| !value.is_blank()) else {
            return self
                .required
                .as_ref()
                .map(|bound| bound.message_or(|| required_message(path)));
        };

        let Some(number) = value.as_number() else {
            return Some(format!("{path} must be a number"));
        };

        if let Some(bound) = &self.min
            && number < bound.value
        {
            return Some(bound.message_or(|| {
                format!("{path} must be greater than or equal to {}", bound.value)
            }));
        }

        None
    }
}

fn required_message(path: &str) -> String {
    format!("{path} is a required field")
}

/// Rule for one field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldRule {
    String(StringRule),
    Number(NumberRule),
}

impl FieldRule {
    pub fn string() -> StringRule {
        StringRule::default()
    }

    pub fn number() -> NumberRule {
        NumberRule::default()
    }

    /// Returns the failing message for `value`, if any.
    pub fn check(&self, path: &str, value: Option<&FieldValue>) -> Option<String> {
        match self {
            Self::String(rule) => rule.check(path, value),
            Self::Number(rule) => rule.check(path, value),
        }
    }
}

impl From<StringRule> for FieldRule {
    fn from(rule: StringRule) -> Self {
        Self::String(rule)
    }
}

impl From<NumberRule> for FieldRule {
    fn from(rule: NumberRule) -> Self {
        Self::Number(rule)
    }
}

/// Ordered set of field rules, validated as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule for `name`.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<FieldRule>) -> Self {
        let name = name.into();
        let rule = rule.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find_map(|(field, rule)| (field == name).then_some(rule))
    }

    /// Checks a single field. Fields without a rule always pass.
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        self.rule(name)?.check(name, values.get(name))
    }

    /// Checks every field; fields not named in the schema are ignored.
    pub fn validate(&self, values: &FormValues) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (name, rule) in &self.fields {
            if let Some(message) = rule.check(name, values.get(name)) {
                errors.insert(name.as_str(), message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
