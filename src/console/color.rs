//! The fixed 16-colour palette and the colour-pair cache.
//!
//! Draw calls name a (foreground, background) pair of palette inks. Every
//! distinct pair is allocated a pair id the first time it is used; ids grow
//! monotonically from 1 and are never reused. Id 0 is the default pair
//! recorded when the console opens.

use std::collections::HashMap;

use crossterm::style::{Color, Colors};

/// One entry of the 16-colour palette, or the terminal's own colour.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Ink {
    Default,
    Black,
    Red,
    Green,
    Orange,
    Blue,
    Magenta,
    Cyan,
    Grey,
    DarkGrey,
    LightRed,
    LightGreen,
    Yellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
}

impl Ink {
    /// Palette order: index 0 is black, 15 is white.
    pub const PALETTE: [Ink; 16] = [
        Ink::Black,
        Ink::Red,
        Ink::Green,
        Ink::Orange,
        Ink::Blue,
        Ink::Magenta,
        Ink::Cyan,
        Ink::Grey,
        Ink::DarkGrey,
        Ink::LightRed,
        Ink::LightGreen,
        Ink::Yellow,
        Ink::LightBlue,
        Ink::LightMagenta,
        Ink::LightCyan,
        Ink::White,
    ];

    pub fn from_index(index: u8) -> Option<Ink> {
        Ink::PALETTE.get(index as usize).copied()
    }

    /// Palette index, `None` for the terminal default.
    pub fn index(self) -> Option<u8> {
        Ink::PALETTE.iter().position(|&i| i == self).map(|i| i as u8)
    }

    pub fn to_color(self) -> Color {
        match self {
            Ink::Default => Color::Reset,
            Ink::Black => Color::Black,
            Ink::Red => Color::DarkRed,
            Ink::Green => Color::DarkGreen,
            Ink::Orange => Color::DarkYellow,
            Ink::Blue => Color::DarkBlue,
            Ink::Magenta => Color::DarkMagenta,
            Ink::Cyan => Color::DarkCyan,
            Ink::Grey => Color::Grey,
            Ink::DarkGrey => Color::DarkGrey,
            Ink::LightRed => Color::Red,
            Ink::LightGreen => Color::Green,
            Ink::Yellow => Color::Yellow,
            Ink::LightBlue => Color::Blue,
            Ink::LightMagenta => Color::Magenta,
            Ink::LightCyan => Color::Cyan,
            Ink::White => Color::White,
        }
    }
}

pub type PairId = u16;

/// `(fg, bg)` → pair id, with the reverse table for drawing.
#[derive(Debug)]
pub struct ColorPairs {
    ids: HashMap<(Ink, Ink), PairId>,
    pairs: Vec<(Ink, Ink)>,
}

impl ColorPairs {
    pub fn new(default_fg: Ink, default_bg: Ink) -> Self {
        let mut ids = HashMap::with_capacity(16);
        ids.insert((default_fg, default_bg), 0);
        ColorPairs { ids, pairs: vec![(default_fg, default_bg)] }
    }

    /// Look up the pair, allocating the next id if it's new.
    pub fn resolve(&mut self, fg: Ink, bg: Ink) -> PairId {
        if let Some(&id) = self.ids.get(&(fg, bg)) {
            return id;
        }
        let id = self.pairs.len() as PairId;
        self.pairs.push((fg, bg));
        self.ids.insert((fg, bg), id);
        id
    }

    pub fn inks(&self, id: PairId) -> Option<(Ink, Ink)> {
        self.pairs.get(id as usize).copied()
    }

    pub fn colors(&self, id: PairId) -> Option<Colors> {
        self.inks(id)
            .map(|(fg, bg)| Colors::new(fg.to_color(), bg.to_color()))
    }

    /// Number of pairs allocated so far, the default pair included.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
