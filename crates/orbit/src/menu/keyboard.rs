use super::controller::{RadialMenu, Response};
use crate::item::MenuItem;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Backspace,
    Home,
    End,
    Escape,
    /// `1` to `9`, one-based.
    Digit(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key `{0}`")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Self::Left,
            "right" | "arrowright" => Self::Right,
            "up" | "arrowup" => Self::Up,
            "down" | "arrowdown" => Self::Down,
            "enter" | "return" => Self::Enter,
            "space" | " " => Self::Space,
            "backspace" => Self::Backspace,
            "home" => Self::Home,
            "end" => Self::End,
            "escape" | "esc" => Self::Escape,
            digit => match digit.parse::<u8>() {
                Ok(n @ 1..=9) => Self::Digit(n),
                _ => return Err(UnknownKey(s.to_string())),
            },
        };
        Ok(key)
    }
}

/// Next item from `from` in the given direction that is not disabled,
/// wrapping around. `None` when every item is disabled.
pub fn next_enabled(items: &[MenuItem], from: Option<usize>, forward: bool) -> Option<usize> {
    let len = items.len();
    if len == 0 {
        return None;
    }
    let start = match (from, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    (0..len)
        .map(|step| {
            if forward {
                (start + step) % len
            } else {
                (start + len - step) % len
            }
        })
        .find(|&i| !items[i].disabled)
}

impl RadialMenu {
    /// Keyboard input. Focus moves never touch the pointer hover.
    pub fn key(&mut self, key: Key) -> Response {
        let before = self.snapshot();
        if !self.is_open() {
            return self.respond(before);
        }

        log::trace!("key {:?}", key);
        match key {
            Key::Escape => self.close_menu(),
            Key::Left => self.move_focus(false),
            Key::Right => self.move_focus(true),
            Key::Down | Key::Enter | Key::Space => {
                if let Some(index) = self.focused().or(self.hovered()) {
                    self.activate(index);
                }
            }
            Key::Up | Key::Backspace => {
                if !self.exit_level() {
                    self.close_menu();
                }
            }
            Key::Home => self.focus(0),
            Key::End => self.focus(self.items().len().saturating_sub(1)),
            Key::Digit(n) => {
                let index = usize::from(n.saturating_sub(1));
                if index < self.items().len() {
                    self.focus(index);
                    self.activate(index);
                }
            }
        }
        self.respond(before)
    }

    /// Wheel input: positive deltas behave like `Right`, negative like `Left`.
    pub fn scroll(&mut self, delta: f64) -> Response {
        if delta > 0.0 {
            self.key(Key::Right)
        } else if delta < 0.0 {
            self.key(Key::Left)
        } else {
            Response::default()
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let next = next_enabled(self.items(), self.focused(), forward);
        if next.is_some() {
            self.set_focus(next);
        }
    }

    fn focus(&mut self, index: usize) {
        if index < self.items().len() {
            self.set_focus(Some(index));
        }
    }
}
