//! Terminal runner (default binary).
//!
//! The engine runs on a tokio runtime and paints through a `TerminalSink`.
//! Keys are read on a plain thread and pushed into the command queue with
//! `blocking_send`.

use std::env;
use std::fs::File;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tui_cascade::engine::{launch, EngineConfig, InputSource, RenderSink, Status};
use tui_cascade::input::{is_press, map_key, should_quit};
use tui_cascade::term::TerminalSink;

const INPUT_POLL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    init_logging()?;
    let config = EngineConfig::from_env();
    info!(?config, "starting");

    let sink = Arc::new(TerminalSink::new());
    sink.enter()?;

    let result = run(config, Arc::clone(&sink));

    // Always try to restore terminal state.
    let _ = sink.exit();

    let status = result?;
    println!(
        "score {}  rows {}  pieces {}{}",
        status.score,
        status.rows_cleared,
        status.pieces,
        if status.is_over() { "  (game over)" } else { "" }
    );
    Ok(())
}

/// Log to `CASCADE_LOG_PATH` if set; the terminal itself is in raw mode.
fn init_logging() -> Result<()> {
    let Some(path) = env::var("CASCADE_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(config: EngineConfig, sink: Arc<TerminalSink>) -> Result<Status> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let game = launch(config, sink.clone());
        let mut status = game.subscribe();

        let (quit_tx, mut quit_rx) = oneshot::channel();
        let input = game.input();
        thread::Builder::new()
            .name("input".into())
            .spawn(move || read_keys(input, quit_tx))
            .context("spawning input thread")?;

        sink.set_status(&status.borrow_and_update());
        sink.refresh();

        loop {
            tokio::select! {
                _ = &mut quit_rx => break,
                changed = status.changed() => {
                    if changed.is_err() {
                        // Processor gone; keep the last frame until quit.
                        let _ = (&mut quit_rx).await;
                        break;
                    }
                    let current = *status.borrow_and_update();
                    sink.set_status(&current);
                    sink.refresh();
                }
            }
        }

        Ok(game.stop())
    })
}

/// Forward key presses until quit.
fn read_keys(input: InputSource, quit: oneshot::Sender<()>) {
    loop {
        let ready = match event::poll(INPUT_POLL) {
            Ok(ready) => ready,
            Err(err) => {
                warn!(%err, "input poll failed");
                break;
            }
        };
        if !ready {
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if is_press(key) => {
                if should_quit(key) {
                    break;
                }
                if let Some(command) = map_key(key) {
                    // Fails once the game is over; only quit is left then.
                    let _ = input.blocking_send(command);
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "input read failed");
                break;
            }
        }
    }
    let _ = quit.send(());
}
