//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `tui_2048::term`.
//! With `--adapter` the same session can also be driven over TCP.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use env_logger::{Env, Target};

use tui_2048::adapter::{Adapter, InboundPayload};
use tui_2048::app::App;
use tui_2048::core::GameSnapshot;
use tui_2048::input::{handle_key_event, should_quit};
use tui_2048::store::{HighScoreStore, JsonFileStore, MemoryStore};
use tui_2048::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_2048::types::POLL_MS;

#[derive(Parser, Debug)]
#[command(name = "tui-2048", version, about = "Play 2048 in the terminal")]
struct Cli {
    /// Seed for tile spawns (default: current time)
    #[arg(long, env = "G2048_SEED")]
    seed: Option<u32>,

    /// Where the best score is kept
    #[arg(long, env = "G2048_HIGH_SCORE_FILE")]
    high_score_file: Option<PathBuf>,

    /// Keep the best score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Accept commands over TCP (see G2048_AI_* variables)
    #[arg(long)]
    adapter: bool,

    /// Write logs to this file
    #[arg(long, env = "G2048_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let seed = cli.seed.unwrap_or_else(time_seed);
    log::info!("starting with seed {}", seed);

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryStore::default())
    } else {
        let path = cli.high_score_file.clone().unwrap_or_else(default_high_score_path);
        log::info!("high score file {}", path.display());
        Box::new(JsonFileStore::new(path))
    };
    let mut app = App::new(seed, store)?;

    let mut adapter = if cli.adapter {
        Adapter::start_from_env()?
    } else {
        None
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, adapter.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run<S: HighScoreStore>(
    term: &mut TerminalRenderer,
    app: &mut App<S>,
    mut adapter: Option<&mut Adapter>,
) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let poll = Duration::from_millis(POLL_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.snapshot_into(&mut snap);
        view.render_into(&snap, app.best(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let mut changed = false;

        if event::poll(poll)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        changed |= app.handle(action).changed();
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if let Some(adapter) = adapter.as_deref_mut() {
            changed |= serve_adapter(app, adapter, &mut snap);
            if changed {
                app.snapshot_into(&mut snap);
                adapter.observe(None, &snap);
            }
        }
    }
}

/// Apply queued adapter commands. Returns true if the session changed.
fn serve_adapter<S: HighScoreStore>(
    app: &mut App<S>,
    adapter: &mut Adapter,
    snap: &mut GameSnapshot,
) -> bool {
    let mut changed = false;
    while let Some(cmd) = adapter.try_recv() {
        match cmd.payload {
            InboundPayload::Actions(actions) => {
                let outcome = app.handle_batch(&actions);
                changed |= outcome.moved;
                adapter.ack(
                    cmd.client_id,
                    cmd.seq,
                    outcome.moved,
                    outcome.score_gained,
                    outcome.game_over,
                );
            }
            InboundPayload::SnapshotRequest => {
                app.snapshot_into(snap);
                adapter.observe(Some(cmd.client_id), snap);
            }
        }
    }
    changed
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    // The terminal is in raw mode, so logs only go to stderr when asked for.
    let Some(path) = log_file else {
        env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn time_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    (nanos ^ (nanos >> 32)) as u32
}

fn default_high_score_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".tui-2048").join("high_score.json"),
        None => PathBuf::from("tui-2048-high-score.json"),
    }
}
