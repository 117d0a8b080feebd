use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pacer_core::input::{InputEvent, InputProvider};

/// Blocks until a terminal event is queued or `timeout` passes.
pub(super) fn wait_for_input(timeout: Duration) -> io::Result<bool> {
    event::poll(timeout)
}

/// Keyboard input over crossterm's event queue. Never blocks; events that are not
/// bound keys are dropped, except that a resize is remembered for the next redraw.
#[derive(Debug, Default)]
pub(super) struct KeyInput {
    resized: bool,
}

impl KeyInput {
    pub(super) fn take_resized(&mut self) -> bool {
        core::mem::take(&mut self.resized)
    }
}

impl InputProvider for KeyInput {
    type Error = io::Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = map_key(key) {
                        return Ok(Some(input));
                    }
                }
                Event::Resize(_, _) => self.resized = true,
                _ => {}
            }
        }
        Ok(None)
    }
}

pub(super) fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Close),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') => Some(InputEvent::TogglePlay),
        KeyCode::Left => Some(InputEvent::StepBack),
        KeyCode::Right => Some(InputEvent::StepForward),
        KeyCode::Char('b') => Some(InputEvent::SkipBack),
        KeyCode::Char('f') => Some(InputEvent::SkipForward),
        KeyCode::Up => Some(InputEvent::Faster),
        KeyCode::Down => Some(InputEvent::Slower),
        KeyCode::Char('r') => Some(InputEvent::Restart),
        KeyCode::Char('m') => Some(InputEvent::CycleParagraphMode),
        KeyCode::Char('v') | KeyCode::Enter => Some(InputEvent::ToggleContentView),
        KeyCode::Esc | KeyCode::Char('q') => Some(InputEvent::Close),
        _ => None,
    }
}
