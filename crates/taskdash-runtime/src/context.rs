//! Display and environment helpers: age strings, truncation, `~` expansion.

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Expand a leading `~` using `$HOME`.
///
/// ```text
/// "~/vimwiki" -> "/home/me/vimwiki"
/// "/srv/wiki" -> "/srv/wiki"
/// ```
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_default();
    if home.is_empty() {
        return PathBuf::from(path);
    }
    if path == "~" {
        PathBuf::from(home)
    } else if let Some(rest) = path.strip_prefix("~/") {
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// True when running inside a tmux client (`$TMUX` set and non-empty).
pub fn inside_tmux() -> bool {
    std::env::var("TMUX").is_ok_and(|v| !v.is_empty())
}

/// Relative age of `updated` as of `now`: `42s ago`, `7m ago`, `2h 5m ago`.
pub fn format_age(updated: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(updated) = updated else {
        return "?".to_string();
    };
    let secs = (now - updated).num_seconds();
    if secs < 0 {
        return "future?".to_string();
    }
    if secs < 60 {
        return format!("{secs}s ago");
    }
    let mins = secs / 60;
    if mins < 60 {
        format!("{mins}m ago")
    } else {
        format!("{}h {}m ago", mins / 60, mins % 60)
    }
}

/// Truncate to `max_len` characters, ending in `...` when shortened.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
