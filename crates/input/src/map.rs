//! Mapping from terminal events to game input.

use crate::types::GameAction;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What a terminal event means to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Action(GameAction),
    Resize(u16, u16),
    Quit,
}

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    // Auto-repeat would re-trigger the drop while a key is held.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameAction::Drop),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),
        _ => None,
    }
}

/// Any mouse button press counts as a drop (the "click or tap" trigger).
pub fn handle_mouse_event(mouse: MouseEvent) -> Option<GameAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left | MouseButton::Right | MouseButton::Middle) => {
            Some(GameAction::Drop)
        }
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

pub fn map_event(event: &Event) -> Option<Input> {
    match *event {
        Event::Key(key) if should_quit(key) => Some(Input::Quit),
        Event::Key(key) => handle_key_event(key).map(Input::Action),
        Event::Mouse(mouse) => handle_mouse_event(mouse).map(Input::Action),
        Event::Resize(w, h) => Some(Input::Resize(w, h)),
        _ => None,
    }
}
