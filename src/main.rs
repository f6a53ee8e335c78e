//! Terminal blockfall runner.
//!
//! Owns the clock and the frame loop: polls crossterm for keys until the next
//! frame is due, feeds commands and timestamps to the engine, and flushes the
//! rendered snapshot through the diffing terminal renderer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};

use blockfall::cli::Options;
use blockfall::core::{Engine, GameSnapshot};
use blockfall::input::{command_for_key, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

/// ~60 frames per second.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let options = Options::parse();

    let mut engine = new_engine(&options)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &mut engine);
    // Restore the terminal even when the loop failed.
    let _ = term.exit();

    let best = engine.high_score();
    result?;
    if best > 0 {
        println!("best score this session: {best}");
    }
    Ok(())
}

fn new_engine(options: &Options) -> Result<Engine> {
    let config = options.engine_config()?;
    let seed = options.seed.unwrap_or_else(clock_seed);
    Engine::new(config, seed).context("starting engine")
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, engine: &mut Engine) -> Result<()> {
    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    // Session best, fed back into the engine after every finished game.
    let mut best = engine.high_score();

    let start = Instant::now();
    let mut next_frame = start;

    loop {
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = command_for_key(key) {
                        engine.handle_command(command);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
            continue;
        }
        next_frame += FRAME;

        engine.update(start.elapsed().as_millis() as u64);
        if let Some(score) = engine.take_high_score_candidate() {
            best = best.max(score);
            engine.set_high_score(best);
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        engine.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Skip frames rather than burst after a stall.
        let now = Instant::now();
        if next_frame < now {
            next_frame = now;
        }
    }
}
