//! twinpane: a line-driven dual-pane file browser.
//!
//! Reads commands from stdin, prints the list and tree panes, and keeps both
//! in sync with the disk through a debounced watcher.

mod app;
mod input;
mod render;
mod watcher;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{select, Receiver};
use tracing_subscriber::EnvFilter;
use twinpane_core::config::session::Session;
use twinpane_core::config::settings::Config;

use crate::app::{App, Reply};
use crate::input::parse_line;
use crate::watcher::{DirWatcher, WatchMessage};

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);
const IDLE_TICK: Duration = Duration::from_millis(100);

/// One wake-up of the main loop.
enum Step {
    /// A line from stdin; `None` at end of input.
    Line(Option<String>),
    Watch(WatchMessage),
    Tick,
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = match Config::default_path() {
        Some(path) => Config::load_or_default(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => Config::default(),
    };
    let session = Session::from_config(&config)?;

    let start_dir = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let start_dir = std::fs::canonicalize(&start_dir).unwrap_or(start_dir);

    run(&start_dir, session)
}

/// Logs go to a file because the terminal is the UI.
fn init_tracing() -> anyhow::Result<()> {
    let log_path = std::env::temp_dir().join("twinpane.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_env("TWINPANE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn run(start_dir: &Path, session: Session) -> anyhow::Result<()> {
    let mut app = App::new(start_dir, session)?;
    tracing::info!("started in {}", start_dir.display());

    let (watch_tx, watch_rx) = crossbeam_channel::unbounded::<WatchMessage>();
    let mut dir_watcher = match DirWatcher::new(watch_tx.clone(), WATCH_DEBOUNCE) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("file watching disabled: {e}");
            None
        }
    };
    follow_current_dir(&app, dir_watcher.as_mut());

    let lines = spawn_stdin_reader()?;
    let mut out = io::stdout().lock();
    print_reply(&mut out, &app.handle(input::Input::Ls)?)?;
    prompt(&mut out)?;

    loop {
        let step = select! {
            recv(lines) -> line => Step::Line(line.ok()),
            recv(watch_rx) -> msg => match msg {
                Ok(msg) => Step::Watch(msg),
                Err(_) => Step::Tick,
            },
            default(IDLE_TICK) => Step::Tick,
        };

        match step {
            Step::Line(None) => break,
            Step::Line(Some(line)) => {
                app.drain_icon_updates();
                let reply = match parse_line(&line) {
                    Ok(input) => app.handle(input)?,
                    Err(message) => Reply {
                        lines: vec![message],
                        quit: false,
                    },
                };
                print_reply(&mut out, &reply)?;
                if reply.quit {
                    break;
                }
                follow_current_dir(&app, dir_watcher.as_mut());
                prompt(&mut out)?;
            }
            Step::Watch(WatchMessage::Changed) => {
                tracing::debug!("directory changed on disk");
                app.on_fs_change()?;
            }
            Step::Watch(WatchMessage::Error(e)) => tracing::warn!("watch error: {e}"),
            Step::Tick => {
                app.drain_icon_updates();
            }
        }
    }

    drop(watch_tx);
    Ok(())
}

fn follow_current_dir(app: &App, watcher: Option<&mut DirWatcher>) {
    if let (Some(watcher), Some(dir)) = (watcher, app.current_dir()) {
        if let Err(e) = watcher.watch(dir) {
            tracing::debug!("cannot watch {}: {e}", dir.display());
        }
    }
}

/// Forwards stdin lines to the main loop; the channel closes at end of input.
fn spawn_stdin_reader() -> anyhow::Result<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("stdin".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(rx)
}

fn print_reply(out: &mut impl Write, reply: &Reply) -> io::Result<()> {
    for line in &reply.lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
