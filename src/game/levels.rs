//! The ordered set of level files and the current-level cursor.
//!
//! Every regular, non-hidden file in the level directory is a level; they
//! are played in lexicographic path order.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelSetError {
    #[error("cannot read level directory '{}': {source}", .dir.display())]
    Unreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("there is no maze in directory '{}'", .dir.display())]
    Empty { dir: PathBuf },

    #[error("level {start} does not exist, there are {count} levels")]
    StartOutOfRange { start: usize, count: usize },
}

#[derive(Clone, Debug)]
pub struct LevelSet {
    paths: Vec<PathBuf>,
    current: usize,
}

impl LevelSet {
    /// Scan `dir` and position the cursor on `start` (1-based).
    pub fn scan(dir: &Path, start: usize) -> Result<Self, LevelSetError> {
        let unreadable = |source| LevelSetError::Unreadable { dir: dir.to_path_buf(), source };

        let mut paths = vec![];
        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            let hidden = path.file_name()
                .map_or(true, |n| n.to_string_lossy().starts_with('.'));
            if path.is_file() && !hidden {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(LevelSetError::Empty { dir: dir.to_path_buf() });
        }
        LevelSet::from_paths(paths, start)
    }

    /// Build from explicit paths; they are sorted here.
    pub fn from_paths(mut paths: Vec<PathBuf>, start: usize) -> Result<Self, LevelSetError> {
        paths.sort();
        if start == 0 || start > paths.len() {
            return Err(LevelSetError::StartOutOfRange { start, count: paths.len() });
        }
        Ok(LevelSet { paths, current: start - 1 })
    }

    pub fn current_path(&self) -> &Path {
        &self.paths[self.current]
    }

    /// 1-based number of the current level.
    pub fn number(&self) -> usize {
        self.current + 1
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Move to the next level. `false` (cursor unchanged) after the last one.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.paths.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }
}
