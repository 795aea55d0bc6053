//! taskdash-core: task state inference and alerting.
//!
//! Parses task files, classifies them against liveness snapshots and
//! tracks which alerts already notified. No async, no subprocesses.

pub mod classify;
pub mod dedup;
pub mod liveness;
pub mod record;
pub mod scan;
pub mod timestamp;

pub use classify::{
    Alert, AlertRules, ClassifiedState, ClassifiedTask, ClassifierConfig, classify,
};
pub use dedup::{Notification, NotificationKey, SeenNotifications};
pub use liveness::{LivenessSnapshot, ProcessEntry, ProcessSnapshot, SessionList};
pub use record::{TaskRecord, UNKNOWN, parse_task_file, parse_task_text};
pub use scan::{list_task_files, scan_tasks, wip_dir};
pub use timestamp::{parse_timestamp, parse_timestamp_at};
