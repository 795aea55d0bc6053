//! Task file parsing: one `.wiki` file -> one [`TaskRecord`].

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::timestamp::parse_timestamp;

/// Placeholder for a name or status the file does not declare.
pub const UNKNOWN: &str = "?";

/// Structured view of one task file, rebuilt every refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub path: PathBuf,
    pub name: String,
    pub status: String,
    /// tmux window index the task's agent runs in, if declared.
    pub session_window: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub progress_done: usize,
    pub progress_total: usize,
}

impl TaskRecord {
    /// A record with only the path known.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: UNKNOWN.to_string(),
            status: UNKNOWN.to_string(),
            session_window: None,
            last_updated: None,
            progress_done: 0,
            progress_total: 0,
        }
    }

    /// `[done/total]`, or `None` when the file has no checklist.
    pub fn progress_label(&self) -> Option<String> {
        (self.progress_total > 0).then(|| format!("[{}/{}]", self.progress_done, self.progress_total))
    }
}

// ─── Field table ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Field {
    Name,
    Status,
    SessionWindow,
    LastUpdated,
}

/// Literal line prefixes. The label text is what task files are written
/// with, so it must not change.
const FIELDS: &[(Field, &str)] = &[
    (Field::Name, "# Task Name:"),
    (Field::Status, "**Status**:"),
    (Field::SessionWindow, "**Tmux Window**:"),
    (Field::LastUpdated, "**Last Updated Date/Time**:"),
];

/// Trimmed value of `line` for `prefix`, or `None` if the line does not
/// carry the field. A prefix followed by whitespace only still matches,
/// with an empty value; a bare prefix does not.
fn field_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    (!rest.is_empty()).then(|| rest.trim())
}

fn leading_digits(value: &str) -> Option<String> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    (end > 0).then(|| value[..end].to_string())
}

/// First line (top to bottom) that yields a value for `prefix` wins.
fn first_match<'a, T>(
    lines: &[&'a str],
    prefix: &str,
    parse: impl Fn(&'a str) -> Option<T>,
) -> Option<T> {
    lines
        .iter()
        .find_map(|&line| field_value(line, prefix).and_then(&parse))
}

/// `[x]`, `- [ ]`, `- [o]` ... at the start of a line.
/// Returns `Some(done)` for checklist lines.
fn checklist_marker(line: &str) -> Option<bool> {
    let rest = line.strip_prefix("- ").unwrap_or(line);
    let mut chars = rest.chars();
    if chars.next()? != '[' {
        return None;
    }
    let marker = chars.next()?;
    if chars.next()? != ']' {
        return None;
    }
    match marker {
        'x' | 'X' => Some(true),
        'o' | 'O' | ' ' => Some(false),
        _ => None,
    }
}

// ─── Parsing ─────────────────────────────────────────────────────

/// Build a record from already-loaded file text.
pub fn parse_task_text(path: impl Into<PathBuf>, text: &str) -> TaskRecord {
    let mut record = TaskRecord::empty(path);
    let lines: Vec<&str> = text.lines().collect();

    for (field, prefix) in FIELDS {
        match field {
            Field::Name => {
                if let Some(name) = first_match(&lines, prefix, |v| Some(v.to_string())) {
                    record.name = name;
                }
            }
            Field::Status => {
                if let Some(status) = first_match(&lines, prefix, |v| Some(v.to_string())) {
                    record.status = status;
                }
            }
            Field::SessionWindow => {
                record.session_window = first_match(&lines, prefix, leading_digits);
            }
            Field::LastUpdated => {
                // A matching line wins even when its timestamp does not parse.
                record.last_updated =
                    first_match(&lines, prefix, |v| Some(parse_timestamp(v))).flatten();
            }
        }
    }

    for line in &lines {
        if let Some(done) = checklist_marker(line) {
            record.progress_total += 1;
            if done {
                record.progress_done += 1;
            }
        }
    }

    record
}

/// Read and parse a task file. Never fails: undecodable bytes are replaced
/// and an unreadable file yields [`TaskRecord::empty`].
pub fn parse_task_file(path: &Path) -> TaskRecord {
    match std::fs::read(path) {
        Ok(bytes) => parse_task_text(path, &String::from_utf8_lossy(&bytes)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "task file unreadable");
            TaskRecord::empty(path)
        }
    }
}
