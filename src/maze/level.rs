//! Level file parsing.
//!
//! One row per line. Trailing whitespace is stripped and blank lines are
//! skipped; shorter rows are padded with Space up to the widest row. A level
//! must fit the screen, have exactly one hero, at least one shelf, and as
//! many boxes as shelves.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::cell::{Cell, HERO};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("maze file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("maze file '{}': doesn't fit into screen sizes {max_width}x{max_height}, line no={line}", .path.display())]
    TooLarge {
        path: PathBuf,
        max_width: usize,
        max_height: usize,
        line: usize,
    },

    #[error("maze file '{}': no hero found", .path.display())]
    NoHero { path: PathBuf },

    #[error("maze file '{}': second hero at {second:?}, first at {first:?}", .path.display())]
    MultipleHeroes {
        path: PathBuf,
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("maze file '{}': there is no shelf in the map", .path.display())]
    NoShelves { path: PathBuf },

    #[error("maze file '{}': {shelves} shelves but {boxes} boxes", .path.display())]
    ShelfBoxMismatch {
        path: PathBuf,
        shelves: usize,
        boxes: usize,
    },
}

/// A parsed level, ready to be played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    /// `cells[y][x]`, every row `width` long.
    pub cells: Vec<Vec<Cell>>,
    pub width: usize,
    pub height: usize,
    pub hero: (usize, usize),
    pub shelves: usize,
    pub boxes: usize,
    pub shelfbox: usize,
}

/// Read and parse a level file.
pub fn load(path: &Path, max_width: usize, max_height: usize) -> Result<Level, LevelError> {
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path, max_width, max_height)
}

/// Parse level text. `path` is only used in error messages.
pub fn parse(text: &str, path: &Path, max_width: usize, max_height: usize) -> Result<Level, LevelError> {
    let mut rows: Vec<&str> = vec![];
    let mut width = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        rows.push(line);
        width = width.max(line.chars().count());
        if rows.len() > max_height || width > max_width {
            return Err(LevelError::TooLarge {
                path: path.to_path_buf(),
                max_width,
                max_height,
                line: rows.len(),
            });
        }
    }

    let height = rows.len();
    let mut cells = vec![vec![Cell::Space; width]; height];
    let mut hero: Option<(usize, usize)> = None;
    let (mut shelves, mut boxes, mut shelfbox) = (0, 0, 0);

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == HERO {
                if let Some(first) = hero {
                    return Err(LevelError::MultipleHeroes {
                        path: path.to_path_buf(),
                        first,
                        second: (x, y),
                    });
                }
                hero = Some((x, y));
                continue;
            }
            let cell = Cell::from_char(ch);
            if cell.is_shelf() { shelves += 1; }
            if cell.has_box() { boxes += 1; }
            if cell == Cell::ShelfBox { shelfbox += 1; }
            cells[y][x] = cell;
        }
    }

    let Some(hero) = hero else {
        return Err(LevelError::NoHero { path: path.to_path_buf() });
    };
    if shelves == 0 {
        return Err(LevelError::NoShelves { path: path.to_path_buf() });
    }
    if shelves != boxes {
        return Err(LevelError::ShelfBoxMismatch {
            path: path.to_path_buf(),
            shelves,
            boxes,
        });
    }

    Ok(Level { cells, width, height, hero, shelves, boxes, shelfbox })
}
