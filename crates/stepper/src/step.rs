//! Step definitions: a label, the rules in force while the step is active and
//! the fields it shows.
use crate::schema::Schema;

/// One selectable value of a [`FieldKind::Select`] field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Number,
    Select(Vec<SelectOption>),
}

/// A field rendered by a step, bound to the form by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn multiline(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Multiline)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }

    /// Options of a select field; empty for every other kind.
    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select(options) => options,
            _ => &[],
        }
    }
}

/// A named, validated screen of the wizard.
#[derive(Clone, Debug, PartialEq)]
pub struct StepDefinition {
    label: String,
    schema: Schema,
    fields: Vec<FieldSpec>,
}

impl StepDefinition {
    pub fn new(label: impl Into<String>, schema: Schema) -> Self {
        Self {
            label: label.into(),
            schema,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}
