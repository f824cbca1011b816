//! Cell kinds and how each one is drawn.
//!
//! Level legend:
//!   '@' = Hero (start position, stored as Space)
//!   ' ' = Space        '#' = Wall
//!   'B' = Box          '*' = Shelf
//!   'X' = Shelf with a box on it
//! Any other character is scenery: drawn verbatim in the default colours
//! and never entered by the hero or a box.

use crate::console::Ink;

pub const HERO: char = '@';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Space,
    Wall,
    Box,
    Shelf,
    ShelfBox,
    Decor(char),
}

/// Glyph and colours of one cell on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Appearance {
    pub glyph: char,
    pub fg: Ink,
    pub bg: Ink,
}

impl Appearance {
    const fn new(glyph: char, fg: Ink, bg: Ink) -> Self {
        Appearance { glyph, fg, bg }
    }
}

pub const HERO_LOOK: Appearance = Appearance::new('☻', Ink::Yellow, Ink::Black);

impl Cell {
    pub fn from_char(c: char) -> Cell {
        match c {
            ' ' => Cell::Space,
            '#' => Cell::Wall,
            'B' => Cell::Box,
            '*' => Cell::Shelf,
            'X' => Cell::ShelfBox,
            other => Cell::Decor(other),
        }
    }

    /// The level-file character for this cell.
    pub fn symbol(self) -> char {
        match self {
            Cell::Space => ' ',
            Cell::Wall => '#',
            Cell::Box => 'B',
            Cell::Shelf => '*',
            Cell::ShelfBox => 'X',
            Cell::Decor(c) => c,
        }
    }

    pub fn is_shelf(self) -> bool {
        matches!(self, Cell::Shelf | Cell::ShelfBox)
    }

    pub fn has_box(self) -> bool {
        matches!(self, Cell::Box | Cell::ShelfBox)
    }

    /// Can a box be pushed into this cell?
    pub fn takes_box(self) -> bool {
        matches!(self, Cell::Space | Cell::Shelf)
    }

    pub fn appearance(self) -> Appearance {
        match self {
            Cell::Space => Appearance::new(' ', Ink::White, Ink::Black),
            Cell::Wall => Appearance::new('░', Ink::Magenta, Ink::Magenta),
            Cell::Box => Appearance::new('⣿', Ink::Blue, Ink::Black),
            Cell::Shelf => Appearance::new('♦', Ink::Green, Ink::Black),
            Cell::ShelfBox => Appearance::new('♦', Ink::Blue, Ink::Green),
            Cell::Decor(c) => Appearance::new(c, Ink::White, Ink::Black),
        }
    }
}
