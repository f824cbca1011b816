//! Console events, the key-read policy and mouse decoding.
//!
//! Mouse reports use the ncurses button-state bitmask so handlers can test
//! bits exactly as a curses program would: for button `b` (1-5) the states
//! RELEASED, PRESSED, CLICKED, DOUBLE_CLICKED and TRIPLE_CLICKED occupy five
//! consecutive bits starting at `5 * (b - 1)`; CTRL/SHIFT/ALT sit above them.

use std::time::{Duration, Instant};

use bitflags::bitflags;
use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

// ── Key-read policy ──

/// How long a key read may wait.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyDelay {
    /// Wait until an event arrives.
    Blocking,
    /// Return at once, idle if nothing is buffered.
    Immediate,
    /// Wait at most this long, then report idle.
    Timeout(Duration),
}

impl KeyDelay {
    /// `< 0` blocks, `0` is immediate, `> 0` is a timeout in milliseconds.
    pub fn from_threshold(ms: i32) -> Self {
        match ms {
            ms if ms < 0 => KeyDelay::Blocking,
            0 => KeyDelay::Immediate,
            ms => KeyDelay::Timeout(Duration::from_millis(ms as u64)),
        }
    }

    pub fn from_blocking(blocking: bool) -> Self {
        if blocking { KeyDelay::Blocking } else { KeyDelay::Immediate }
    }
}

// ── Events ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConsoleEvent {
    Key(KeyEvent),
    Mouse(MouseReport),
    Resize { rows: u16, cols: u16 },
    /// Nothing arrived within the key delay.
    Idle,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MouseReport {
    pub row: u16,
    pub col: u16,
    pub buttons: MouseButtons,
}

/// Handler verdict: keep polling or leave the loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Stop,
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct MouseButtons: u32 {
        const BUTTON1_RELEASED       = 0o1;
        const BUTTON1_PRESSED        = 0o2;
        const BUTTON1_CLICKED        = 0o4;
        const BUTTON1_DOUBLE_CLICKED = 0o10;
        const BUTTON1_TRIPLE_CLICKED = 0o20;

        const BUTTON2_RELEASED       = 0o1 << 5;
        const BUTTON2_PRESSED        = 0o2 << 5;
        const BUTTON2_CLICKED        = 0o4 << 5;
        const BUTTON2_DOUBLE_CLICKED = 0o10 << 5;
        const BUTTON2_TRIPLE_CLICKED = 0o20 << 5;

        const BUTTON3_RELEASED       = 0o1 << 10;
        const BUTTON3_PRESSED        = 0o2 << 10;
        const BUTTON3_CLICKED        = 0o4 << 10;
        const BUTTON3_DOUBLE_CLICKED = 0o10 << 10;
        const BUTTON3_TRIPLE_CLICKED = 0o20 << 10;

        const BUTTON4_RELEASED       = 0o1 << 15;
        const BUTTON4_PRESSED        = 0o2 << 15;
        const BUTTON4_CLICKED        = 0o4 << 15;
        const BUTTON4_DOUBLE_CLICKED = 0o10 << 15;
        const BUTTON4_TRIPLE_CLICKED = 0o20 << 15;

        const BUTTON5_RELEASED       = 0o1 << 20;
        const BUTTON5_PRESSED        = 0o2 << 20;
        const BUTTON5_CLICKED        = 0o4 << 20;
        const BUTTON5_DOUBLE_CLICKED = 0o10 << 20;
        const BUTTON5_TRIPLE_CLICKED = 0o20 << 20;

        const BUTTON_CTRL  = 0o1 << 25;
        const BUTTON_SHIFT = 0o2 << 25;
        const BUTTON_ALT   = 0o4 << 25;
    }
}

/// Per-button state bits, before shifting to the button's slot.
const RELEASED: u32 = 0o1;
const PRESSED: u32 = 0o2;
const CLICKED: u32 = 0o4;
const DOUBLE_CLICKED: u32 = 0o10;
const TRIPLE_CLICKED: u32 = 0o20;

impl MouseButtons {
    /// State bits for button 1-5.
    fn for_button(button: u8, state: u32) -> Self {
        MouseButtons::from_bits_retain(state << (5 * (u32::from(button) - 1)))
    }

    fn modifiers(mods: KeyModifiers) -> Self {
        let mut bits = MouseButtons::empty();
        if mods.contains(KeyModifiers::CONTROL) {
            bits |= MouseButtons::BUTTON_CTRL;
        }
        if mods.contains(KeyModifiers::SHIFT) {
            bits |= MouseButtons::BUTTON_SHIFT;
        }
        if mods.contains(KeyModifiers::ALT) {
            bits |= MouseButtons::BUTTON_ALT;
        }
        bits
    }
}

/// curses numbering: left = 1, middle = 2, right = 3.
fn button_number(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}

// ── Click synthesis ──

/// Default curses click interval (1/6 s).
pub const CLICK_INTERVAL: Duration = Duration::from_millis(166);

#[derive(Clone, Copy, Debug)]
struct Press {
    button: u8,
    row: u16,
    col: u16,
    at: Instant,
}

#[derive(Clone, Copy, Debug)]
struct Click {
    press: Press,
    count: u8,
}

/// Turns raw press/release pairs into curses-style click reports.
///
/// A press is reported immediately. A release at the press position within
/// the click interval becomes CLICKED; further clicks at the same spot within
/// the interval become DOUBLE_CLICKED, then TRIPLE_CLICKED.
#[derive(Debug)]
pub struct MouseTracker {
    interval: Duration,
    pressed: Option<Press>,
    last_click: Option<Click>,
}

impl Default for MouseTracker {
    fn default() -> Self {
        MouseTracker::new(CLICK_INTERVAL)
    }
}

impl MouseTracker {
    pub fn new(interval: Duration) -> Self {
        MouseTracker { interval, pressed: None, last_click: None }
    }

    /// Decode one crossterm mouse event. Motion and horizontal scroll
    /// have no curses counterpart and yield `None`.
    pub fn decode(&mut self, event: &MouseEvent, now: Instant) -> Option<MouseReport> {
        let (row, col) = (event.row, event.column);
        let state = match event.kind {
            MouseEventKind::Down(button) => {
                let button = button_number(button);
                self.pressed = Some(Press { button, row, col, at: now });
                MouseButtons::for_button(button, PRESSED)
            }
            MouseEventKind::Up(button) => {
                let button = button_number(button);
                self.release(button, row, col, now)
            }
            MouseEventKind::ScrollUp => MouseButtons::for_button(4, PRESSED),
            MouseEventKind::ScrollDown => MouseButtons::for_button(5, PRESSED),
            MouseEventKind::Drag(_)
            | MouseEventKind::Moved
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => return None,
        };
        Some(MouseReport {
            row,
            col,
            buttons: state | MouseButtons::modifiers(event.modifiers),
        })
    }

    fn release(&mut self, button: u8, row: u16, col: u16, now: Instant) -> MouseButtons {
        let press = match self.pressed.take() {
            Some(p) if p.button == button && p.row == row && p.col == col
                && now.duration_since(p.at) <= self.interval => p,
            _ => {
                self.last_click = None;
                return MouseButtons::for_button(button, RELEASED);
            }
        };

        let count = match self.last_click {
            Some(c) if c.press.button == button && c.press.row == row && c.press.col == col
                && press.at.duration_since(c.press.at) <= self.interval * 2 => (c.count + 1).min(3),
            _ => 1,
        };
        self.last_click = Some(Click { press, count });

        let state = match count {
            1 => CLICKED,
            2 => DOUBLE_CLICKED,
            _ => TRIPLE_CLICKED,
        };
        MouseButtons::for_button(button, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, row: u16, col: u16) -> MouseEvent {
        MouseEvent { kind, column: col, row, modifiers: KeyModifiers::NONE }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn threshold_selects_policy() {
        assert_eq!(KeyDelay::from_threshold(-1), KeyDelay::Blocking);
        assert_eq!(KeyDelay::from_threshold(0), KeyDelay::Immediate);
        assert_eq!(KeyDelay::from_threshold(250), KeyDelay::Timeout(ms(250)));
        assert_eq!(KeyDelay::from_blocking(true), KeyDelay::Blocking);
        assert_eq!(KeyDelay::from_blocking(false), KeyDelay::Immediate);
    }

    #[test]
    fn curses_bit_layout() {
        assert_eq!(MouseButtons::BUTTON1_PRESSED.bits(), 0x2);
        assert_eq!(MouseButtons::BUTTON2_RELEASED.bits(), 0x20);
        assert_eq!(MouseButtons::BUTTON3_CLICKED.bits(), 0x1000);
        assert_eq!(MouseButtons::BUTTON4_PRESSED.bits(), 0x10000);
        assert_eq!(MouseButtons::BUTTON5_PRESSED.bits(), 0x200000);
        assert_eq!(MouseButtons::BUTTON_CTRL.bits(), 0x2000000);
        assert_eq!(MouseButtons::BUTTON_SHIFT.bits(), 0x4000000);
        assert_eq!(MouseButtons::BUTTON_ALT.bits(), 0x8000000);
    }

    #[test]
    fn press_is_reported_immediately() {
        let mut t = MouseTracker::default();
        let r = t.decode(&mouse(MouseEventKind::Down(MouseButton::Right), 3, 7), Instant::now()).unwrap();
        assert_eq!((r.row, r.col), (3, 7));
        assert_eq!(r.buttons, MouseButtons::BUTTON3_PRESSED);
    }

    #[test]
    fn quick_release_becomes_click_then_double_then_triple() {
        let mut t = MouseTracker::default();
        let t0 = Instant::now();
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 1, 1);
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 1, 1);

        t.decode(&down, t0);
        assert_eq!(t.decode(&up, t0 + ms(50)).unwrap().buttons, MouseButtons::BUTTON1_CLICKED);
        t.decode(&down, t0 + ms(100));
        assert_eq!(t.decode(&up, t0 + ms(150)).unwrap().buttons, MouseButtons::BUTTON1_DOUBLE_CLICKED);
        t.decode(&down, t0 + ms(200));
        assert_eq!(t.decode(&up, t0 + ms(250)).unwrap().buttons, MouseButtons::BUTTON1_TRIPLE_CLICKED);
    }

    #[test]
    fn slow_release_is_plain_release() {
        let mut t = MouseTracker::default();
        let t0 = Instant::now();
        t.decode(&mouse(MouseEventKind::Down(MouseButton::Middle), 0, 0), t0);
        let r = t.decode(&mouse(MouseEventKind::Up(MouseButton::Middle), 0, 0), t0 + ms(500)).unwrap();
        assert_eq!(r.buttons, MouseButtons::BUTTON2_RELEASED);
    }

    #[test]
    fn release_elsewhere_is_plain_release() {
        let mut t = MouseTracker::default();
        let t0 = Instant::now();
        t.decode(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), t0);
        let r = t.decode(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 5), t0 + ms(20)).unwrap();
        assert_eq!(r.buttons, MouseButtons::BUTTON1_RELEASED);
    }

    #[test]
    fn wheel_maps_to_buttons_four_and_five() {
        let mut t = MouseTracker::default();
        let now = Instant::now();
        let up = t.decode(&mouse(MouseEventKind::ScrollUp, 0, 0), now).unwrap();
        let down = t.decode(&mouse(MouseEventKind::ScrollDown, 0, 0), now).unwrap();
        assert_eq!(up.buttons, MouseButtons::BUTTON4_PRESSED);
        assert_eq!(down.buttons, MouseButtons::BUTTON5_PRESSED);
    }

    #[test]
    fn modifiers_are_added() {
        let mut t = MouseTracker::default();
        let mut ev = mouse(MouseEventKind::Down(MouseButton::Left), 0, 0);
        ev.modifiers = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let r = t.decode(&ev, Instant::now()).unwrap();
        assert_eq!(
            r.buttons,
            MouseButtons::BUTTON1_PRESSED | MouseButtons::BUTTON_CTRL | MouseButtons::BUTTON_ALT
        );
    }

    #[test]
    fn motion_is_ignored() {
        let mut t = MouseTracker::default();
        assert!(t.decode(&mouse(MouseEventKind::Moved, 2, 2), Instant::now()).is_none());
        assert!(t.decode(&mouse(MouseEventKind::Drag(MouseButton::Left), 2, 2), Instant::now()).is_none());
    }
}
