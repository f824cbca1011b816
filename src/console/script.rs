//! In-memory [`Screen`] for tests: replays a fixed list of input events and
//! keeps everything drawn on it.

use std::collections::VecDeque;
use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Canvas, ConsoleEvent, Ink, KeyDelay, Screen};

pub struct ScriptedScreen {
    width: u16,
    height: u16,
    events: VecDeque<ConsoleEvent>,
    delay: KeyDelay,
    /// Every text drawn, clears included.
    pub drawn: Vec<(u16, u16, String)>,
    pub clears: usize,
    pub beeps: usize,
    /// Delay in force at each poll.
    pub polls: Vec<KeyDelay>,
}

impl ScriptedScreen {
    pub fn new(width: u16, height: u16, events: impl IntoIterator<Item = ConsoleEvent>) -> Self {
        ScriptedScreen {
            width,
            height,
            events: events.into_iter().collect(),
            delay: KeyDelay::Immediate,
            drawn: Vec::new(),
            clears: 0,
            beeps: 0,
            polls: Vec::new(),
        }
    }

    /// Events not read yet.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn shows(&self, text: &str) -> bool {
        self.drawn.iter().any(|(_, _, t)| t.contains(text))
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn char_key(c: char) -> ConsoleEvent {
    ConsoleEvent::Key(key(KeyCode::Char(c)))
}

impl Canvas for ScriptedScreen {
    fn draw_text(&mut self, row: u16, col: u16, text: &str, _fg: Ink, _bg: Ink) -> io::Result<()> {
        self.drawn.push((row, col, text.to_string()));
        Ok(())
    }
}

impl Screen for ScriptedScreen {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn beep(&mut self) -> io::Result<()> {
        self.beeps += 1;
        Ok(())
    }

    fn print(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        self.draw_text(row, col, text, Ink::Default, Ink::Default)
    }

    fn set_key_delay(&mut self, threshold_ms: i32) {
        self.delay = KeyDelay::from_threshold(threshold_ms);
    }

    fn poll_key(&mut self, blocking: Option<bool>) -> io::Result<ConsoleEvent> {
        if let Some(blocking) = blocking {
            self.delay = KeyDelay::from_blocking(blocking);
        }
        self.polls.push(self.delay);
        let event = self.events.pop_front().unwrap_or(ConsoleEvent::Idle);
        if let ConsoleEvent::Resize { rows, cols } = event {
            self.width = cols;
            self.height = rows;
        }
        Ok(event)
    }
}
