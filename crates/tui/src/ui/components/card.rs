use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use crate::ui::theme::Theme;

/// A container with rounded borders and a title.
///
/// Used both for the wizard card and for each outlined input.
pub struct Card<'a> {
    title: &'a str,
    theme: &'a Theme,
    focused: bool,
    invalid: bool,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            theme,
            focused: false,
            invalid: false,
        }
    }

    /// Mark this card as focused (uses accent border color).
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Mark this card as holding an invalid value (uses error border color).
    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn block(&self) -> Block<'a> {
        let border_color = if self.invalid {
            self.theme.error
        } else if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        let mut title_style = Style::default().fg(if self.invalid {
            self.theme.error
        } else {
            self.theme.accent
        });
        if self.focused {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }

        Block::default()
            .title(Span::styled(format!(" {} ", self.title), title_style))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(self.theme.surface))
    }

    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }

    /// Renders the frame and returns the area left for content.
    pub fn render_frame(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let inner = self.inner(area);
        frame.render_widget(self.block(), area);
        inner
    }
}
