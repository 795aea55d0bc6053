//! Task directory listing and per-cycle classification.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::classify::{ClassifiedTask, ClassifierConfig, classify};
use crate::liveness::LivenessSnapshot;
use crate::record::parse_task_file;

/// Subdirectory of the wiki root holding in-progress tasks.
pub const WIP_DIR: &str = "wip";

/// Extension of task files.
pub const TASK_EXTENSION: &str = "wiki";

pub fn wip_dir(root: &Path) -> PathBuf {
    root.join(WIP_DIR)
}

/// Regular `*.wiki` files directly under `dir`, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_task_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "task directory unreadable");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == TASK_EXTENSION))
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}

/// Parse and classify every task file in `dir` against one liveness snapshot.
pub fn scan_tasks(
    dir: &Path,
    liveness: &LivenessSnapshot,
    config: &ClassifierConfig,
    now: NaiveDateTime,
) -> Vec<ClassifiedTask> {
    list_task_files(dir)
        .iter()
        .map(|path| {
            let record = parse_task_file(path);
            let state = classify(&record, liveness, config, now);
            ClassifiedTask { record, state }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_wiki_files_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["c.wiki", "a.wiki", "notes.md", "b.wiki.bak", "b.wiki"] {
            std::fs::write(dir.path().join(name), "").expect("write");
        }
        std::fs::create_dir(dir.path().join("nested.wiki")).expect("mkdir");

        let names: Vec<String> = list_task_files(dir.path())
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, ["a.wiki", "b.wiki", "c.wiki"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(list_task_files(&wip_dir(dir.path())).is_empty());
    }
}
