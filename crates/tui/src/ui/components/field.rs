use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};
use stepper::{FieldKind, FieldSpec};

use crate::ui::{components::card::Card, theme::Theme};

/// What a field shows: the current text and an error, if visible.
pub struct FieldView<'a> {
    pub spec: &'a FieldSpec,
    pub text: &'a str,
    pub error: Option<&'a str>,
    pub focused: bool,
}

/// Rows a field needs, including the error line under it.
pub fn field_height(spec: &FieldSpec) -> u16 {
    match spec.kind {
        FieldKind::Multiline => 6,
        _ => 4,
    }
}

pub fn render_field(frame: &mut Frame<'_>, area: Rect, view: &FieldView<'_>, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let card = Card::new(&view.spec.label, theme)
        .focused(view.focused)
        .invalid(view.error.is_some());
    let inner = card.render_frame(frame, rows[0]);

    let content = match &view.spec.kind {
        FieldKind::Select(options) => Text::from(select_line(view, options.as_slice(), theme)),
        _ => text_lines(view, theme),
    };
    frame.render_widget(Paragraph::new(content).wrap(Wrap { trim: false }), inner);

    if let Some(error) = view.error {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {error}"), Style::default().fg(theme.error))),
            rows[1],
        );
    }
}

/// One row per line of input; the cursor trails the last one.
fn text_lines<'a>(view: &FieldView<'a>, theme: &Theme) -> Text<'a> {
    let style = if view.focused {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let mut lines: Vec<Line<'a>> = view
        .text
        .split('\n')
        .map(|line| Line::from(Span::styled(line, style)))
        .collect();
    if view.focused
        && let Some(last) = lines.last_mut()
    {
        last.push_span(Span::styled("│", Style::default().fg(theme.accent)));
    }
    Text::from(lines)
}

fn select_line<'a>(
    view: &FieldView<'a>,
    options: &'a [stepper::SelectOption],
    theme: &Theme,
) -> Line<'a> {
    let label = options
        .iter()
        .find(|option| option.value == view.text)
        .map(|option| option.label.as_str())
        .unwrap_or("Select…");
    let arrow_style = if view.focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let value_style = if view.text.is_empty() {
        Style::default().fg(theme.text_muted)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled("‹ ", arrow_style),
        Span::styled(label, value_style),
        Span::styled(" ›", arrow_style),
    ])
}
