//! Terminal Tetris runner (default binary).
//!
//! Owns the fixed-timestep loop: poll input with a deadline, apply the
//! mapped actions, advance the engine's gravity schedule, draw the
//! snapshot. All game rules live in `termtris-core`.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};

use termtris::core::GameState;
use termtris::input::{handle_key_event, should_quit};
use termtris::term::{GameView, TerminalRenderer, Viewport};
use termtris::types::TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunConfig {
    seed: u32,
}

impl RunConfig {
    fn parse(args: &[String]) -> Result<Self> {
        let mut seed = None;
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --seed"))?;
                    seed = Some(
                        v.parse::<u32>()
                            .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                    );
                }
                other => {
                    return Err(anyhow!("unknown argument: {}", other));
                }
            }
            i += 1;
        }
        Ok(Self {
            seed: seed.unwrap_or_else(clock_seed),
        })
    }
}

/// Seed from the wall clock when none is given on the command line.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() as u32) ^ d.subsec_nanos())
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = RunConfig::parse(&args)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: RunConfig) -> Result<()> {
    let mut game = GameState::new(config.seed);
    game.start();

    let view = GameView::default();
    let mut snapshot = game.snapshot();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snapshot);
        let fb = view.render(&snapshot, Viewport::new(w, h));
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
        }
    }
}
