//! Shared-keyboard input: one event reader fans key presses out to a pad per
//! player slot, and each pad is polled like an independent controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;

use super::handler::{InputHandler, KeyAction};
use super::sampler::InputSource;
use crate::game::{Direction, Game};

#[derive(Debug, Default)]
struct PadState {
    direction: Option<Direction>,
    reset: bool,
    quit: bool,
}

/// Latched key state for one slot; every poll consumes what it reads
#[derive(Debug, Clone, Default)]
pub struct KeyboardPad {
    state: Arc<Mutex<PadState>>,
}

impl KeyboardPad {
    fn lock(&self) -> MutexGuard<'_, PadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputSource for KeyboardPad {
    fn poll_direction(&mut self) -> Option<Direction> {
        self.lock().direction.take()
    }

    fn poll_reset_requested(&mut self) -> bool {
        std::mem::take(&mut self.lock().reset)
    }

    fn poll_quit_requested(&mut self) -> bool {
        std::mem::take(&mut self.lock().quit)
    }
}

/// The set of pads fed by one terminal keyboard
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    pads: [KeyboardPad; InputHandler::SLOTS],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pad(&self, slot: usize) -> Option<KeyboardPad> {
        self.pads.get(slot).cloned()
    }

    /// Route one decoded key press. Reset and quit reach every pad.
    pub fn apply(&self, action: KeyAction) {
        match action {
            KeyAction::Steer { slot, direction } => {
                if let Some(pad) = self.pads.get(slot) {
                    pad.lock().direction = Some(direction);
                }
            }
            KeyAction::Reset => self.pads.iter().for_each(|pad| pad.lock().reset = true),
            KeyAction::Quit => self.pads.iter().for_each(|pad| pad.lock().quit = true),
            KeyAction::None => {}
        }
    }

    /// Read terminal events until the game quits or the stream ends
    pub async fn run(self, game: Game) -> Result<()> {
        let handler = InputHandler::new();
        let mut events = EventStream::new();

        while !game.is_quit() {
            let Some(event) = events.next().await else {
                break;
            };
            let event = event.context("Failed to read terminal event")?;

            if let Event::Key(key) = event {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = handler.handle_key_event(key);
                if action == KeyAction::Quit {
                    // make sure quit lands even with no pad bound
                    game.quit(true);
                }
                self.apply(action);
            }
        }

        Ok(())
    }
}
