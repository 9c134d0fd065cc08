//! Terminal match-3 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `tui_match3::term`.
//! Set `MATCH3_LOG=<path>` to write tracing output to a file; the terminal itself
//! is owned by the renderer, so nothing is logged to stdout or stderr.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use tui_match3::core::BoardSnapshot;
use tui_match3::engine::{GameSession, SessionConfig};
use tui_match3::input::{handle_key_event, should_quit, Cursor};
use tui_match3::term::{CursorView, FrameBuffer, GameView, HudView, TerminalRenderer, Viewport};
use tui_match3::types::{InputAction, TICK_MS};

const ENV_LOG: &str = "MATCH3_LOG";

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(ENV_LOG) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let config = SessionConfig::from_env().context("invalid MATCH3_* configuration")?;
    let session = GameSession::new(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut session: GameSession) -> Result<()> {
    let view = GameView::default();
    let board = session.config().board;
    let mut cursor = Cursor::new(board.width, board.height);
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        let hud = HudView {
            score: session.score(),
            high_score: session.high_score(),
            remaining_ms: session
                .clock()
                .is_timed()
                .then(|| session.remaining_ms()),
        };
        let cursor_view = CursorView {
            pos: cursor.pos(),
            selection: cursor.selection(),
        };
        view.render_into(&snap, &hud, Some(&cursor_view), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(&mut session, &mut cursor, action)?;
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
            for event in session.take_events() {
                trace!(?event, "cascade event");
            }
        }
    }
}

fn apply_action(session: &mut GameSession, cursor: &mut Cursor, action: InputAction) -> Result<()> {
    if action == InputAction::Restart {
        session.restart()?;
        cursor.reset();
        return Ok(());
    }
    // The board only takes input while nothing is resolving.
    if session.is_busy() || session.is_game_over() {
        return Ok(());
    }
    if let Some((a, b)) = cursor.apply(action) {
        let accepted = session.request_swap(a, b);
        debug!(?a, ?b, accepted, "player swap");
    }
    Ok(())
}
