//! taskdash: terminal dashboard for agent-driven task files.
//!
//! One process, one task: scan the wip directory, probe tmux and the
//! process table, render, wait for a key or the next interval.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::event::EventStream;
use taskdash_tmux::{SubprocessRunner, Tmux};

mod cli;
mod context;
mod notifier;
mod refresh_loop;
mod render;
mod shutdown;
mod terminal;

use notifier::DesktopNotifier;
use refresh_loop::Dashboard;
use render::{DIM, RESET};
use shutdown::ShutdownSignals;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = args.dashboard_config();
    let mut tmux = Tmux::new(SubprocessRunner::default());
    if let Some(socket) = &args.tmux_socket {
        tmux = tmux.with_socket_path(socket.clone());
    }
    let mut dashboard = Dashboard::new(config.clone(), tmux, DesktopNotifier::default());

    if args.json {
        let tasks = dashboard.scan().await;
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    terminal::require_interactive()?;
    if !config.in_tmux {
        eprintln!("{DIM}Not inside tmux: window switching disabled.{RESET}");
    }
    tracing::info!(
        wip_dir = %config.wip_dir.display(),
        interval_secs = config.interval.as_secs(),
        notifications = config.notifications,
        "taskdash starting"
    );

    let signals = ShutdownSignals::install().context("failed to install signal handlers")?;
    let mut stdout = std::io::stdout();
    {
        let _guard = terminal::TerminalGuard::acquire().context("failed to enter raw mode")?;
        dashboard
            .run(&mut stdout, EventStream::new(), signals.wait())
            .await?;
    }
    println!("\n{DIM}Goodbye.{RESET}");
    stdout.flush()?;
    Ok(())
}

/// Append plain-text logs to `path`. The screen belongs to the dashboard,
/// so nothing is ever logged to the terminal.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = std::env::var("TASKDASH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
