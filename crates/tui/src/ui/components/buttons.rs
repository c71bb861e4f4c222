use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use stepper::StepWizard;

use crate::ui::theme::Theme;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Back (only past the first step) and the submit button.
pub fn render_buttons(
    frame: &mut Frame<'_>,
    area: Rect,
    wizard: &StepWizard,
    spinner_tick: usize,
    theme: &Theme,
) {
    let mut spans = Vec::new();

    if wizard.can_go_back() {
        let style = if wizard.back_enabled() {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        spans.push(Span::styled("[ Back ]", style));
        spans.push(Span::raw("  "));
    }

    let label = if wizard.is_pending() {
        format!("[ {} {} ]", spinner_frame(spinner_tick), wizard.submit_label())
    } else {
        format!("[ {} ]", wizard.submit_label())
    };
    let style = if wizard.submit_enabled() {
        Style::default()
            .fg(theme.surface)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    spans.push(Span::styled(label, style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
