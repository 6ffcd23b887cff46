//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which keymap applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    /// Typing into the links form.
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SwitchTab(usize),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Open,
    Close,
    EditLinks,
    Refresh,
    Logout,
    InsertChar(char),
    DeleteChar,
    NextField,
    PrevField,
    Submit,
    LeaveEdit,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    match mode {
        InputMode::Browse => map_browse_key(event),
        InputMode::Edit => map_edit_key(event),
    }
}

fn map_browse_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('e') => Some(Action::EditLinks),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Esc => Some(Action::Close),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        KeyCode::Char(c @ '1'..='6') => Some(Action::SwitchTab(c as usize - '1' as usize)),
        _ => None,
    }
}

fn map_edit_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('s') => Some(Action::Submit),
            KeyCode::Char('c') => Some(Action::LeaveEdit),
            _ => None,
        };
    }

    match code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::LeaveEdit),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Char(c) if !c.is_control() => Some(Action::InsertChar(c)),
        _ => None,
    }
}
