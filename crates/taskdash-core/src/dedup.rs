//! Edge-triggered notification bookkeeping across refresh cycles.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::classify::ClassifiedTask;

/// (task path, alert kind prefix).
pub type NotificationKey = (PathBuf, String);

/// A notification to deliver for a newly raised attention-class alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub path: PathBuf,
    /// Task name, used as the notification subtitle.
    pub task_name: String,
    /// Full alert text.
    pub message: String,
}

/// Alert keys that already produced a notification and are still active.
///
/// Owned by the refresh loop for the life of the process.
#[derive(Debug, Default)]
pub struct SeenNotifications {
    seen: HashSet<NotificationKey>,
}

impl SeenNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle's classified tasks into the seen set.
    ///
    /// Returns notifications for attention-class alerts whose key was not
    /// seen before. Keys absent from this cycle are then forgotten, so a
    /// condition that clears for a cycle and comes back notifies again.
    pub fn reconcile(&mut self, tasks: &[ClassifiedTask]) -> Vec<Notification> {
        let mut current: HashSet<NotificationKey> = HashSet::new();
        let mut fresh = Vec::new();

        for task in tasks {
            for alert in &task.state.alerts {
                let key = (task.record.path.clone(), alert.kind_prefix());
                if alert.is_attention() && !self.seen.contains(&key) {
                    fresh.push(Notification {
                        path: task.record.path.clone(),
                        task_name: task.record.name.clone(),
                        message: alert.to_string(),
                    });
                    self.seen.insert(key.clone());
                }
                current.insert(key);
            }
        }

        self.seen.retain(|key| current.contains(key));
        fresh
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
