use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Padding, Paragraph},
};

use crate::ui::theme::Theme;

pub const TITLE: &str = "Transaction Form";

const HEADER_HEIGHT: u16 = 3;
const MIN_CARD_WIDTH: u16 = 48;
const MAX_CARD_WIDTH: u16 = 96;

/// Areas laid out by the page shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLayout {
    pub header: Rect,
    pub content: Rect,
    pub footer: Rect,
}

/// Header bar with the fixed title, a centered column for the wizard card
/// and a one-line footer.
pub fn layout(area: Rect) -> ShellLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let two_thirds = (u32::from(area.width) * 2 / 3) as u16;
    let width = two_thirds.clamp(
        MIN_CARD_WIDTH.min(area.width),
        MAX_CARD_WIDTH.min(area.width),
    );
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(rows[2]);

    ShellLayout {
        header: rows[0],
        content: column,
        footer: rows[3],
    }
}

pub fn render_header(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let block = Block::default()
        .style(Style::default().bg(theme.header))
        .padding(Padding::new(2, 2, 1, 0));
    let title = Paragraph::new(Span::styled(
        TITLE,
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    ))
    .block(block);
    frame.render_widget(title, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_centered_below_header() {
        let shell = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(shell.header.height, HEADER_HEIGHT);
        assert_eq!(shell.content.width, 80);
        assert_eq!(shell.content.x, 20);
        assert_eq!(shell.content.y, HEADER_HEIGHT + 1);
        assert_eq!(shell.footer.y, 39);
    }

    #[test]
    fn narrow_terminals_use_full_width() {
        let shell = layout(Rect::new(0, 0, 40, 20));
        assert_eq!(shell.content.width, 40);
        assert_eq!(shell.content.x, 0);
    }
}
