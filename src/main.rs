//! Terminal match-3 runner (default binary).
//!
//! Reads the board configuration from `MATCH3_*` environment variables,
//! drives the turn machine on a fixed tick and draws through the
//! framebuffer renderer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use match3::core::{Game, GameConfig, GameSnapshot};
use match3::input::{handle_key_event, should_quit, Cursor};
use match3::term::{CursorView, FrameBuffer, GameView, TerminalRenderer, Viewport};
use match3::types::{BoardAction, TICK_MS};

fn main() -> Result<()> {
    let mut config = GameConfig::from_env();
    if std::env::var_os("MATCH3_SEED").is_none() {
        config.seed = clock_seed();
    }
    config.validate()?;
    let kinds: Vec<&str> = config.kinds.iter().map(|k| k.as_str()).collect();
    eprintln!(
        "[match3] {}x{} board, kinds [{}], seed {}",
        config.width,
        config.height,
        kinds.join(" "),
        config.seed
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Ok(score) = &result {
        eprintln!("[match3] final score {}", score);
    }
    result.map(|_| ())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<u32> {
    let mut cursor = Cursor::new(config.width, config.height);
    let mut game = Game::new(config, ());
    game.start();

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_size = (0, 0);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        if (w, h) != last_size {
            term.invalidate();
            last_size = (w, h);
        }
        game.snapshot_into(&mut snap);
        let cursor_view = CursorView {
            pos: cursor.pos(),
            selected: cursor.selected(),
        };
        view.render_into(&snap, Some(&cursor_view), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if should_quit(key) {
                        return Ok(game.score());
                    }
                    if let Some(action) = handle_key_event(key) {
                        if action == BoardAction::Restart {
                            game.restart();
                        }
                        if let Some((from, to)) = cursor.apply(action) {
                            game.try_swap(from, to);
                        }
                    }
                }
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            game.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }
    }
}
