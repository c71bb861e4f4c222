pub mod components;
pub mod keymap;
pub mod screens;
pub mod shell;

mod terminal;
mod theme;

use ratatui::{Frame, text::Line, widgets::Paragraph};

use crate::app::AppState;

pub use terminal::{AppTerminal as Terminal, install_panic_hook, restore_terminal, setup_terminal};
pub use theme::Theme;

/// Page shell around the wizard card, footer hints and the toast.
pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    let shell = shell::layout(area);

    shell::render_header(frame, shell.header, &theme);
    screens::wizard::render(frame, shell.content, state, &theme);
    render_footer(frame, shell.footer, state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_footer(frame: &mut Frame<'_>, area: ratatui::layout::Rect, state: &AppState, theme: &Theme) {
    let focused = state.focused_field().map(|field| &field.kind);
    let context = components::hints::wizard_hints(&state.wizard, focused);

    let mut parts = components::hints::hints_to_spans(&context, theme);
    if !parts.is_empty() {
        parts.push(components::hints::hint_separator(theme));
    }
    parts.extend(components::hints::hints_to_spans(
        &components::hints::global_hints(),
        theme,
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use stepper::FieldValue;

    use super::*;

    fn screen_text(state: &AppState) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn first_step_renders_title_fields_and_next() {
        let state = AppState::new(crate::form::wizard(std::time::Duration::ZERO));
        let text = screen_text(&state);

        assert!(text.contains(shell::TITLE));
        assert!(text.contains("Transaction Title"));
        assert!(text.contains("[ Next ]"));
        assert!(!text.contains("[ Back ]"));
    }

    #[test]
    fn second_step_shows_back_and_touched_errors() {
        let mut wizard = crate::form::wizard(std::time::Duration::ZERO);
        wizard.set_value("title", "Groceries Jan".into());
        wizard.set_value("category", "Grocery".into());
        let _ = wizard.submit();
        wizard.set_value("amount", FieldValue::Number(0.0));
        let _ = wizard.submit();

        let text = screen_text(&AppState::new(wizard));
        assert!(text.contains("[ Back ]"));
        assert!(text.contains("amount must be greater than or equal to 1"));
        assert!(text.contains("(✔)"));
    }
}
