use ratatui::{style::Style, text::Span};
use stepper::{FieldKind, StepWizard};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: String,
    pub action: String,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            hint.key.clone(),
            Style::default().fg(theme.accent),
        ));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for the wizard in its current state and focused field.
pub fn wizard_hints(wizard: &StepWizard, focused: Option<&FieldKind>) -> Vec<KeyHint> {
    if wizard.is_completed() || wizard.is_pending() {
        return Vec::new();
    }

    let mut hints = vec![KeyHint::new("Tab", "next field")];
    let submit = wizard.submit_label().to_lowercase();
    match focused {
        Some(FieldKind::Select(_)) => {
            hints.push(KeyHint::new("←→", "choose"));
            hints.push(KeyHint::new("Enter", submit));
        }
        Some(FieldKind::Multiline) => {
            hints.push(KeyHint::new("Enter", "new line"));
            hints.push(KeyHint::new("Ctrl+S", submit));
        }
        _ => hints.push(KeyHint::new("Enter", submit)),
    }
    if wizard.back_enabled() {
        hints.push(KeyHint::new("Esc", "back"));
    }
    hints
}

pub fn global_hints() -> Vec<KeyHint> {
    vec![KeyHint::new("Ctrl+C", "quit")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepper::{FieldRule, FormValues, Schema, StepDefinition, SubmitError};

    fn wizard() -> StepWizard {
        StepWizard::new(
            FormValues::new().with("name", "Ada"),
            vec![
                StepDefinition::new("One", Schema::new().field("name", FieldRule::string())),
                StepDefinition::new("Two", Schema::new()),
            ],
            |_values| async { Ok::<(), SubmitError>(()) },
        )
    }

    fn keys(hints: &[KeyHint]) -> Vec<&str> {
        hints.iter().map(|hint| hint.key.as_str()).collect()
    }

    #[test]
    fn first_step_has_no_back_hint() {
        let hints = wizard_hints(&wizard(), Some(&FieldKind::Text));
        assert_eq!(keys(&hints), vec!["Tab", "Enter"]);
        assert_eq!(hints[1].action, "next");
    }

    #[test]
    fn later_steps_offer_back_and_select_keys() {
        let mut wizard = wizard();
        let _ = wizard.submit();
        let hints = wizard_hints(&wizard, Some(&FieldKind::Select(Vec::new())));
        assert_eq!(keys(&hints), vec!["Tab", "←→", "Enter", "Esc"]);
        assert_eq!(hints[2].action, "submit");
    }

    #[test]
    fn multiline_field_moves_submit_off_enter() {
        let mut wizard = wizard();
        let _ = wizard.submit();
        let hints = wizard_hints(&wizard, Some(&FieldKind::Multiline));
        assert_eq!(keys(&hints), vec!["Tab", "Enter", "Ctrl+S", "Esc"]);
        assert_eq!(hints[1].action, "new line");
        assert_eq!(hints[2].action, "submit");
    }
}
