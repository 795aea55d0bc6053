//! Alert classification: record + liveness + staleness threshold -> state.
//!
//! Pure function, no IO. The alert order produced here is the display and
//! priority order used everywhere downstream.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::liveness::LivenessSnapshot;
use crate::record::TaskRecord;

// ─── Rules ───────────────────────────────────────────────────────

/// Keyword tables driving classification. Immutable; callers pick a table
/// and pass it in with the rest of [`ClassifierConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRules {
    /// Status substrings meaning the task is finished.
    pub completion_words: &'static [&'static str],
    /// Status substrings meaning a human has to step in.
    pub blocked_words: &'static [&'static str],
    /// Hook event names that, as the whole status, need a human.
    pub hook_attention_statuses: &'static [&'static str],
}

impl AlertRules {
    pub const DEFAULT: AlertRules = AlertRules {
        completion_words: &["done", "complete", "finished"],
        blocked_words: &[
            "waiting for",
            "waiting on",
            "blocked",
            "needs review",
            "paused",
            "stuck",
        ],
        hook_attention_statuses: &[
            "permissionrequest",
            "posttoolusefailure",
            "stop",
            "sessionend",
        ],
    };

    pub fn is_completed(&self, status: &str) -> bool {
        let lower = status.to_lowercase();
        self.completion_words.iter().any(|w| lower.contains(w))
    }

    pub fn is_blocked(&self, status: &str) -> bool {
        let lower = status.to_lowercase();
        self.blocked_words.iter().any(|w| lower.contains(w))
            || self.hook_attention_statuses.iter().any(|s| *s == lower)
    }
}

impl Default for AlertRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the classifier needs besides the record and liveness data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub rules: AlertRules,
    /// Tasks not updated for longer than this are stale.
    pub stale_after: Duration,
    /// Case-insensitive substring identifying the agent process.
    pub agent_marker: String,
}

impl ClassifierConfig {
    pub fn new(stale_minutes: u32) -> Self {
        Self {
            stale_after: Duration::minutes(i64::from(stale_minutes)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_agent_marker(mut self, marker: impl Into<String>) -> Self {
        self.agent_marker = marker.into();
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: AlertRules::DEFAULT,
            stale_after: Duration::minutes(10),
            agent_marker: "claude".to_string(),
        }
    }
}

// ─── Alerts ──────────────────────────────────────────────────────

/// One alert reason. `Display` yields the operator-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    NeedsAttention { status: String },
    NotRunning,
    Stale { minutes: i64 },
    Completed,
}

impl Alert {
    /// Attention-class alerts are the ones that notify.
    pub fn is_attention(&self) -> bool {
        matches!(self, Alert::NeedsAttention { .. } | Alert::NotRunning)
    }

    /// Alert text up to the first `(`, so that an ongoing condition with
    /// changing detail (`STALE (12m ...)` -> `STALE (13m ...)`) keeps one key.
    pub fn kind_prefix(&self) -> String {
        let text = self.to_string();
        text.split('(').next().unwrap_or_default().trim().to_string()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::NeedsAttention { status } => write!(f, "NEEDS ATTENTION (status: {status})"),
            Alert::NotRunning => f.write_str("NOT RUNNING"),
            Alert::Stale { minutes } => write!(f, "STALE ({minutes}m since last update)"),
            Alert::Completed => f.write_str("COMPLETED"),
        }
    }
}

// ─── Classified state ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedState {
    pub is_completed: bool,
    pub is_blocked: bool,
    pub session_exists: bool,
    pub has_active_process: bool,
    pub is_stale: bool,
    /// Priority order: attention, not running, stale, completed.
    pub alerts: Vec<Alert>,
}

impl ClassifiedState {
    /// Alert texts in priority order.
    pub fn alert_reasons(&self) -> Vec<String> {
        self.alerts.iter().map(ToString::to_string).collect()
    }
}

/// A record paired with its classification for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedTask {
    #[serde(flatten)]
    pub record: TaskRecord,
    #[serde(flatten)]
    pub state: ClassifiedState,
}

/// Classify one task as of `now`.
pub fn classify(
    record: &TaskRecord,
    liveness: &LivenessSnapshot,
    config: &ClassifierConfig,
    now: NaiveDateTime,
) -> ClassifiedState {
    let is_completed = config.rules.is_completed(&record.status);
    let is_blocked = config.rules.is_blocked(&record.status);
    let session_exists = record
        .session_window
        .as_deref()
        .is_some_and(|w| liveness.sessions.find_window(w).is_some());
    let path = record.path.to_string_lossy();
    let has_active_process = liveness
        .processes
        .has_agent_for(&path, &config.agent_marker);

    let mut alerts = Vec::new();
    if is_blocked {
        alerts.push(Alert::NeedsAttention {
            status: record.status.clone(),
        });
    }
    if !has_active_process && !is_completed {
        alerts.push(Alert::NotRunning);
    }
    let mut is_stale = false;
    if let Some(updated) = record.last_updated {
        let age = now - updated;
        if age > config.stale_after {
            is_stale = true;
            alerts.push(Alert::Stale {
                minutes: age.num_minutes(),
            });
        }
    }
    if is_completed {
        alerts.push(Alert::Completed);
    }

    ClassifiedState {
        is_completed,
        is_blocked,
        session_exists,
        has_active_process,
        is_stale,
        alerts,
    }
}
