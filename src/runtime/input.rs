//! Default key and mouse bindings for the panel runtime.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::layout::Heading;

use super::focus::FocusCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Focus(FocusCommand),
    CycleMode,
    Quit,
}

/// Map a key press to a runtime action. Releases and repeats are ignored.
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char(ch @ '1'..='4') => Action::Focus(FocusCommand::Slot(ch as u8 - b'0')),
        KeyCode::Tab => Action::Focus(FocusCommand::Next),
        KeyCode::BackTab => Action::Focus(FocusCommand::Previous),
        KeyCode::Left | KeyCode::Char('h') => Action::Focus(FocusCommand::Move(Heading::Left)),
        KeyCode::Right | KeyCode::Char('l') => Action::Focus(FocusCommand::Move(Heading::Right)),
        KeyCode::Up | KeyCode::Char('k') => Action::Focus(FocusCommand::Move(Heading::Up)),
        KeyCode::Down | KeyCode::Char('j') => Action::Focus(FocusCommand::Move(Heading::Down)),
        KeyCode::Char('a' | 'A') => Action::Focus(FocusCommand::ToggleAccordion),
        KeyCode::Char('m' | 'M') => Action::CycleMode,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Left button presses focus the panel under the pointer.
pub fn action_for_mouse(mouse: &MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Focus(FocusCommand::Click {
            x: mouse.column,
            y: mouse.row,
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_map_to_slots() {
        assert_eq!(
            action_for_key(&press(KeyCode::Char('3'))),
            Some(Action::Focus(FocusCommand::Slot(3)))
        );
        assert_eq!(action_for_key(&press(KeyCode::Char('5'))), None);
    }

    #[test]
    fn vim_keys_mirror_arrows() {
        assert_eq!(
            action_for_key(&press(KeyCode::Char('j'))),
            action_for_key(&press(KeyCode::Down))
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Char('h'))),
            Some(Action::Focus(FocusCommand::Move(Heading::Left)))
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Tab,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(action_for_key(&release), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&key), Some(Action::Quit));
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&key), None);
    }

    #[test]
    fn left_click_becomes_focus_click() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            action_for_mouse(&mouse),
            Some(Action::Focus(FocusCommand::Click { x: 12, y: 7 }))
        );

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..mouse
        };
        assert_eq!(action_for_mouse(&scroll), None);
    }
}
