//! Republishes terminal key events on the app event channel.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

pub(crate) const KEY_ENTER: u16 = 13;
pub(crate) const KEY_ESCAPE: u16 = 27;
pub(crate) const KEY_LEFT: u16 = 37;
pub(crate) const KEY_UP: u16 = 38;
pub(crate) const KEY_RIGHT: u16 = 39;
pub(crate) const KEY_DOWN: u16 = 40;

/// Legacy numeric code of `code`, for the keys that have one we care about.
pub(crate) fn legacy_key_code(code: KeyCode) -> Option<u16> {
    match code {
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Esc => Some(KEY_ESCAPE),
        KeyCode::Left => Some(KEY_LEFT),
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Right => Some(KEY_RIGHT),
        KeyCode::Down => Some(KEY_DOWN),
        _ => None,
    }
}

pub(crate) struct KeyboardRouter {
    app_event_tx: AppEventSender,
}

impl KeyboardRouter {
    pub(crate) fn new(app_event_tx: AppEventSender) -> Self {
        Self { app_event_tx }
    }

    /// Publish `event` as a generic key press and, when it has one, as its
    /// legacy key code. Releases are ignored; repeats publish again.
    pub(crate) fn publish(&self, event: KeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }
        self.app_event_tx.send(AppEvent::KeyPress(event));
        if let Some(code) = legacy_key_code(event.code) {
            self.app_event_tx.send(AppEvent::KeyCode(code));
        }
    }
}
