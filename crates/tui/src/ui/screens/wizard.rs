use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            buttons::render_buttons,
            card::Card,
            field::{FieldView, field_height, render_field},
            step_indicator::{STEPPER_HEIGHT, render_stepper},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let wizard = &state.wizard;
    let inner = Card::new("New transaction", theme).render_frame(frame, area);

    let step = wizard.active_step();
    let mut constraints = vec![Constraint::Length(STEPPER_HEIGHT), Constraint::Length(1)];
    constraints.extend(
        step.fields()
            .iter()
            .map(|field| Constraint::Length(field_height(field))),
    );
    constraints.push(Constraint::Length(1)); // submission error
    constraints.push(Constraint::Length(1)); // buttons
    constraints.push(Constraint::Min(0)); // summary

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    render_stepper(frame, rows[0], wizard, theme);

    let form = wizard.form();
    for (index, field) in step.fields().iter().enumerate() {
        let view = FieldView {
            spec: field,
            text: state.field_text(&field.name),
            error: form.visible_error(&field.name),
            focused: !wizard.is_completed() && state.focus == index,
        };
        render_field(frame, rows[2 + index], &view, theme);
    }

    let after_fields = 2 + step.fields().len();
    if let Some(message) = wizard.submit_error() {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.error))),
            rows[after_fields],
        );
    }

    render_buttons(frame, rows[after_fields + 1], wizard, state.spinner_tick, theme);

    if wizard.is_completed() {
        render_summary(frame, rows[after_fields + 2], state, theme);
    }
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Transaction submitted",
            Style::default()
                .fg(theme.positive)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    for step in state.wizard.steps() {
        for field in step.fields() {
            let value = state
                .wizard
                .values()
                .get(&field.name)
                .map(|value| value.to_string().replace('\n', " / "))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", field.label), Style::default().fg(theme.text_muted)),
                Span::styled(value, Style::default().fg(theme.text)),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
