use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use stepper::{StepMarker, StepWizard};

use crate::ui::theme::Theme;

/// Rows used by [`render_stepper`]: icons, then labels below them.
pub const STEPPER_HEIGHT: u16 = 3;

/// Renders one marker per step, labels under the icons.
pub fn render_stepper(frame: &mut Frame<'_>, area: Rect, wizard: &StepWizard, theme: &Theme) {
    let count = wizard.step_count().max(1) as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (marker, column) in wizard.step_markers().zip(columns.iter()) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(*column);

        let (icon, style) = marker_icon(&marker, theme);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(icon, style))).alignment(Alignment::Center),
            rows[0],
        );

        let label_style = if marker.active && !marker.complete {
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
        } else if marker.complete {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.text_muted)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(marker.label, label_style))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[1],
        );
    }
}

fn marker_icon(marker: &StepMarker<'_>, theme: &Theme) -> (String, Style) {
    if marker.complete {
        ("(✔)".to_string(), Style::default().fg(theme.positive))
    } else if marker.active {
        (
            format!("({})", marker.index + 1),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("({})", marker.index + 1),
            Style::default().fg(theme.text_muted),
        )
    }
}
