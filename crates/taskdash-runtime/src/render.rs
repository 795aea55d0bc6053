//! Dashboard rendering: classified tasks -> one ANSI screen.
//!
//! Pure projection; the refresh loop writes the result. Lines end in
//! `\r\n` because the terminal is in raw mode while the loop runs.

use chrono::NaiveDateTime;
use taskdash_core::{Alert, ClassifiedTask};

use crate::context::{format_age, truncate};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
pub(crate) const DIM: &str = "\x1b[2m";
pub(crate) const RESET: &str = "\x1b[0m";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const NAME_WIDTH: usize = 34;
const STATUS_WIDTH: usize = 16;
const AGE_WIDTH: usize = 12;

/// Header, task table, alerts section and key hints.
pub fn render_dashboard(
    tasks: &[ClassifiedTask],
    interval_secs: u64,
    in_tmux: bool,
    now: NaiveDateTime,
) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{BOLD}=== Task Dashboard === {} (every {interval_secs}s){RESET}",
        now.format("%H:%M:%S")
    ));
    lines.push(String::new());

    if tasks.is_empty() {
        lines.push(format!("  {DIM}No active tasks in wip/{RESET}"));
        lines.push(String::new());
    } else {
        lines.push(format!(
            "{BOLD}  {:>3}  {:<NAME_WIDTH$}  {:<STATUS_WIDTH$}  {:<AGE_WIDTH$}  AGENT{RESET}",
            "#", "TASK", "STATUS", "UPDATED"
        ));
        lines.push(format!(
            "  {}  {}  {}  {}  {}",
            "─".repeat(3),
            "─".repeat(NAME_WIDTH),
            "─".repeat(STATUS_WIDTH),
            "─".repeat(AGE_WIDTH),
            "─".repeat(18)
        ));
        for (idx, task) in tasks.iter().enumerate() {
            lines.push(task_row(idx + 1, task, now));
        }
        lines.extend(alert_lines(tasks));
    }

    let switch_hint = if in_tmux { "  [1-N] switch to window" } else { "" };
    lines.push(String::new());
    lines.push(format!("{DIM}[r]efresh{switch_hint}  [q]uit{RESET}"));

    format!("{CLEAR_SCREEN}{}\r\n> ", lines.join("\r\n"))
}

fn task_row(index: usize, task: &ClassifiedTask, now: NaiveDateTime) -> String {
    let record = &task.record;
    let colour = row_colour(&task.state.alerts);
    let name = truncate(&record.name, NAME_WIDTH);
    let status = truncate(&record.status, STATUS_WIDTH);
    let age = format_age(record.last_updated, now);
    let agent = if task.state.has_active_process {
        "RUNNING"
    } else {
        "STOPPED"
    };
    let window = record
        .session_window
        .as_deref()
        .map(|w| format!(" (win {w})"))
        .unwrap_or_default();
    let progress = record.progress_label().unwrap_or_default();
    format!(
        "  {colour}{index:>3}  {name:<NAME_WIDTH$}  {status:<STATUS_WIDTH$}  {age:<AGE_WIDTH$}  {agent}{window} {progress}{RESET}"
    )
}

/// Every non-COMPLETED alert with its task's 1-based index.
fn alert_lines(tasks: &[ClassifiedTask]) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, task) in tasks.iter().enumerate() {
        for alert in &task.state.alerts {
            if *alert == Alert::Completed {
                continue;
            }
            let colour = if alert.is_attention() { RED } else { YELLOW };
            lines.push(format!(
                "  {colour}! #{} {} - {alert}{RESET}",
                idx + 1,
                task.record.name
            ));
        }
    }
    if !lines.is_empty() {
        lines.insert(0, format!("{BOLD}Alerts:{RESET}"));
        lines.insert(0, String::new());
    }
    lines
}

/// Colour of the highest-priority alert.
fn row_colour(alerts: &[Alert]) -> &'static str {
    if alerts.iter().any(Alert::is_attention) {
        RED
    } else if alerts.iter().any(|a| matches!(a, Alert::Stale { .. })) {
        YELLOW
    } else if alerts.contains(&Alert::Completed) {
        CYAN
    } else {
        GREEN
    }
}
