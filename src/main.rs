//! Terminal stacker runner (default binary).
//!
//! Drives the game with a [`Ticker`] fed from a monotonic clock, reads input
//! with crossterm between frames, and draws through [`TermStage`] and the
//! diffing [`TerminalRenderer`]. Each frame updates before it renders.

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use crossterm::event;

use tui_stacker::core::{
    GameConfig, GameState, JsonConfigFile, LaunchOptions, LocalLeaderboard, Stage, Ticker,
};
use tui_stacker::input::{map_event, Input};
use tui_stacker::term::{TermStage, TerminalRenderer, Viewport};
use tui_stacker::types::{GameAction, TARGET_FPS};

fn main() -> Result<()> {
    let options = LaunchOptions::from_env();
    init_logging(&options)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &options);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(options: &LaunchOptions) -> Result<()> {
    // Without a log file, stay quiet unless RUST_LOG asks otherwise.
    let default_filter = if options.log_file.is_some() {
        "info"
    } else {
        "off"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = &options.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn seed_from_clock() -> u32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() as u32) ^ now.subsec_nanos()
}

fn run(term: &mut TerminalRenderer, options: &LaunchOptions) -> Result<()> {
    let seed = options.seed.unwrap_or_else(seed_from_clock);
    log::info!("starting with seed {}", seed);

    let mut game = GameState::new(seed);
    let mut scores = LocalLeaderboard::new(options.player.clone());

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut stage = TermStage::new(Viewport::new(w, h));

    // A failed load keeps the game in Loading; the view shows it.
    let prepared = match &options.config_path {
        Some(path) => game.prepare(&mut JsonConfigFile(path.clone()), &mut scores),
        None => game.prepare(&mut GameConfig::default(), &mut scores),
    };
    if prepared.is_ok() {
        if let Some(config) = game.config() {
            stage.configure(config);
        }
    }

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

    let mut ticker = Ticker::default();
    ticker.start(now_ms());
    // Game time excludes pauses so animations resume where they stopped.
    let mut paused_at: Option<f64> = None;
    let mut paused_total_ms = 0.0;

    let frame_duration = Duration::from_secs_f64(1.0 / TARGET_FPS);
    let mut next_frame = Instant::now();

    loop {
        // Input until the next frame is due.
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match map_event(&event::read()?) {
                Some(Input::Quit) => break,
                Some(Input::Resize(w, h)) => {
                    stage.resize(w, h);
                    term.invalidate();
                }
                Some(Input::Action(GameAction::Drop)) => {
                    if ticker.is_started() {
                        if let Err(e) = game.action(&mut scores) {
                            log::warn!("action failed: {}", e);
                        }
                    }
                }
                Some(Input::Action(GameAction::Pause)) => {
                    let now = now_ms();
                    match paused_at.take() {
                        Some(since) => {
                            paused_total_ms += now - since;
                            ticker.start(now);
                        }
                        None => {
                            paused_at = Some(now);
                            ticker.stop();
                        }
                    }
                }
                None => {}
            }
        }
        if Instant::now() < next_frame {
            continue;
        }

        next_frame = Instant::now() + frame_duration;
        if let Some(frame) = ticker.advance(now_ms()) {
            game.tick(frame.time_ms - paused_total_ms, frame.delta);
        }
        game.render(&mut stage);
        term.draw_swap(stage.frame_mut())?;
    }

    match game.load_error() {
        Some(message) => Err(anyhow!("game failed to load: {}", message)),
        None => Ok(()),
    }
}
