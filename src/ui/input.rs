//! Key handling for the complaint form

use crate::services::{Field, FormEvent, FormState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    FocusNext,
    FocusPrev,
    Form(FormEvent),
    Submit,
    Lookup,
}

fn edit(field: Field, value: String) -> Action {
    Action::Form(FormEvent::Edit { field, value })
}

/// Translate a key press into an action for the focused control
pub fn map_key(key: KeyEvent, focus: Field, state: &FormState) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('s') if ctrl => Action::Submit,
        KeyCode::Char('l') if ctrl => Action::Lookup,
        KeyCode::Esc => {
            if state.notification.is_some() {
                Action::Form(FormEvent::DismissNotification)
            } else {
                Action::Quit
            }
        }
        KeyCode::Tab | KeyCode::Down => Action::FocusNext,
        KeyCode::BackTab | KeyCode::Up => Action::FocusPrev,
        KeyCode::Enter if focus == Field::Description => {
            let mut value = state.draft.description.clone();
            value.push('\n');
            edit(focus, value)
        }
        KeyCode::Enter => Action::Submit,
        KeyCode::Left if focus == Field::Reason => {
            Action::Form(FormEvent::SelectReason(state.draft.reason.prev()))
        }
        KeyCode::Right if focus == Field::Reason => {
            Action::Form(FormEvent::SelectReason(state.draft.reason.next()))
        }
        KeyCode::Backspace if focus.is_text() => {
            let mut value = state.field_value(focus).to_string();
            value.pop();
            edit(focus, value)
        }
        KeyCode::Char(c) if focus.is_text() && !ctrl => {
            let mut value = state.field_value(focus).to_string();
            value.push(c);
            edit(focus, value)
        }
        _ => Action::None,
    }
}
