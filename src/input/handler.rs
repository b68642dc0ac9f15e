use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a single key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Steer the player sitting at keyboard slot `slot`
    Steer { slot: usize, direction: Direction },
    Reset,
    Quit,
    None,
}

/// Keyboard layout for up to four players sharing one keyboard:
/// arrows, WASD, IJKL and 8/4/5/6. R resets, Q/Esc/Ctrl+C quits.
pub struct InputHandler;

impl InputHandler {
    pub const SLOTS: usize = 4;

    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => steer(0, Direction::Up),
            KeyCode::Down => steer(0, Direction::Down),
            KeyCode::Left => steer(0, Direction::Left),
            KeyCode::Right => steer(0, Direction::Right),

            KeyCode::Esc => KeyAction::Quit,

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => steer(1, Direction::Up),
                's' => steer(1, Direction::Down),
                'a' => steer(1, Direction::Left),
                'd' => steer(1, Direction::Right),

                'i' => steer(2, Direction::Up),
                'k' => steer(2, Direction::Down),
                'j' => steer(2, Direction::Left),
                'l' => steer(2, Direction::Right),

                '8' => steer(3, Direction::Up),
                '5' => steer(3, Direction::Down),
                '4' => steer(3, Direction::Left),
                '6' => steer(3, Direction::Right),

                'q' => KeyAction::Quit,
                'r' => KeyAction::Reset,
                _ => KeyAction::None,
            },

            _ => KeyAction::None,
        }
    }
}

fn steer(slot: usize, direction: Direction) -> KeyAction {
    KeyAction::Steer { slot, direction }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
