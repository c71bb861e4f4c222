use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Back,
    NextField,
    PrevField,
    /// Plain Enter: a newline in a multiline field, submit elsewhere.
    Enter,
    Submit,
    Backspace,
    PrevOption,
    NextOption,
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> AppAction {
    if key.kind == KeyEventKind::Release {
        return AppAction::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => AppAction::Quit,
            KeyCode::Char('s') | KeyCode::Enter => AppAction::Submit,
            _ => AppAction::None,
        };
    }

    if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Enter {
        return AppAction::Submit;
    }

    match key.code {
        KeyCode::Esc => AppAction::Back,
        KeyCode::Tab | KeyCode::Down => AppAction::NextField,
        KeyCode::BackTab | KeyCode::Up => AppAction::PrevField,
        KeyCode::Enter => AppAction::Enter,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Left => AppAction::PrevOption,
        KeyCode::Right => AppAction::NextOption,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}
