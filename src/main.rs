//! Entry point: parse arguments, find the levels, run the game.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use sokoban::config::GameConfig;
use sokoban::console::{run_loop, Console, Screen};
use sokoban::game::{Game, LevelSet, Session, Summary};

#[derive(Parser, Debug)]
#[command(version, about = "Push every box onto a shelf.")]
struct Cli {
    /// Level to start from (1-based).
    #[arg(default_value_t = 1)]
    level: usize,

    /// Directory of level files, instead of the configured one.
    #[arg(long, value_name = "DIR")]
    levels: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    colog::init();
    let cli = Cli::parse();
    let config = GameConfig::load();

    let levels_dir = cli.levels.unwrap_or_else(|| config.levels_dir.clone());
    let levels = LevelSet::scan(&levels_dir, cli.level)?;
    info!("{} levels in {}, starting at {}", levels.len(), levels_dir.display(), cli.level);

    let mut console = Console::open(config.display.default_fg, config.display.default_bg, false)
        .context("terminal init failed")?;

    let result = play(&mut console, levels, &config);

    // Restore the terminal before anything is reported.
    let cleanup = console.shutdown();
    let summary = result?;
    cleanup.context("terminal cleanup failed")?;

    report(&summary);
    Ok(())
}

fn play(console: &mut Console, levels: LevelSet, config: &GameConfig) -> anyhow::Result<Summary> {
    let session = Session::start(levels, console.width() as usize, console.height() as usize)?;
    let mut game = Game::new(session, config.timing.clone());
    game.redraw(console)?;
    run_loop(console, config.timing.poll_interval, &mut game)?;
    Ok(game.summary())
}

fn report(summary: &Summary) {
    if summary.completed {
        info!("all levels passed ({} solved this run)", summary.solved);
    } else {
        info!("stopped at map {} ({} solved this run)", summary.last_level, summary.solved);
    }
}
