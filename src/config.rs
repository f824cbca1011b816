//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::console::Ink;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub levels_dir: PathBuf,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Sleep between two polls of the event loop.
    pub poll_interval: Duration,
    /// Pause between the winning push and the "solved" window.
    pub win_pause: Duration,
}

#[derive(Clone, Copy, Debug)]
pub struct DisplayConfig {
    pub default_fg: Ink,
    pub default_bg: Ink,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    display: TomlDisplay,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_poll_interval")]
    poll_interval_ms: u64,
    #[serde(default = "default_win_pause")]
    win_pause_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlDisplay {
    /// Palette index 0-15; absent means the terminal's own colour.
    #[serde(default)]
    default_fg: Option<u8>,
    #[serde(default)]
    default_bg: Option<u8>,
}

// ── Defaults ──

fn default_levels_dir() -> String { "mazes".into() }
fn default_poll_interval() -> u64 { 50 }
fn default_win_pause() -> u64 { 200 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { levels_dir: default_levels_dir() }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            poll_interval_ms: default_poll_interval(),
            win_pause_ms: default_win_pause(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly (no file search).
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        GameConfig {
            levels_dir: resolve_levels_dir(&toml_cfg.general.levels_dir, search_dirs),
            timing: TimingConfig {
                poll_interval: Duration::from_millis(toml_cfg.timing.poll_interval_ms),
                win_pause: Duration::from_millis(toml_cfg.timing.win_pause_ms),
            },
            display: DisplayConfig {
                default_fg: palette_ink(toml_cfg.display.default_fg, "default_fg"),
                default_bg: palette_ink(toml_cfg.display.default_bg, "default_bg"),
            },
        }
    }
}

/// Absolute paths are used as-is; relative ones are looked up in the
/// candidate dirs and otherwise left relative to CWD.
fn resolve_levels_dir(levels_dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = Path::new(levels_dir);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(levels_dir))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| path.to_path_buf())
}

fn palette_ink(index: Option<u8>, key: &str) -> Ink {
    match index {
        None => Ink::Default,
        Some(i) => Ink::from_index(i).unwrap_or_else(|| {
            warn!("config.toml: display.{key} = {i} is outside the 16-colour palette");
            Ink::Default
        }),
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!("{}: parse error: {e}; using default settings", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.levels_dir, PathBuf::from("mazes"));
        assert_eq!(cfg.timing.poll_interval, Duration::from_millis(50));
        assert_eq!(cfg.timing.win_pause, Duration::from_millis(200));
        assert_eq!(cfg.display.default_fg, Ink::Default);
        assert_eq!(cfg.display.default_bg, Ink::Default);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse("[timing]\npoll_interval_ms = 10\n").unwrap();
        assert_eq!(cfg.timing.poll_interval, Duration::from_millis(10));
        assert_eq!(cfg.timing.win_pause, Duration::from_millis(200));
    }

    #[test]
    fn palette_indices_map_to_inks() {
        let cfg = GameConfig::parse("[display]\ndefault_fg = 15\ndefault_bg = 0\n").unwrap();
        assert_eq!(cfg.display.default_fg, Ink::White);
        assert_eq!(cfg.display.default_bg, Ink::Black);
    }

    #[test]
    fn out_of_palette_index_falls_back() {
        let cfg = GameConfig::parse("[display]\ndefault_fg = 99\n").unwrap();
        assert_eq!(cfg.display.default_fg, Ink::Default);
    }

    #[test]
    fn absolute_levels_dir_is_kept() {
        let dir = std::env::temp_dir();
        let text = format!("[general]\nlevels_dir = {:?}\n", dir.to_string_lossy());
        let cfg = GameConfig::parse(&text).unwrap();
        assert_eq!(cfg.levels_dir, dir);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::parse("[timing\n").is_err());
    }
}
