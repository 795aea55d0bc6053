//! Liveness snapshots consumed by the classifier.
//!
//! Both are captured once per refresh cycle by the tmux/process probes and
//! shared read-only across every task classified in that cycle.

/// One `ps` entry: pid plus full command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub command: String,
}

/// Process table captured at the start of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    entries: Vec<ProcessEntry>,
}

impl ProcessSnapshot {
    /// Parse `<pid> <command line>` lines, dropping `exclude_pid`.
    ///
    /// The monitor excludes itself so that its own command line (which may
    /// name a task file) is never mistaken for a running agent. Lines whose
    /// first token is not a pid (headers, blanks) are skipped.
    pub fn parse(output: &str, exclude_pid: u32) -> Self {
        let entries = output
            .lines()
            .filter_map(parse_ps_line)
            .filter(|entry| entry.pid != exclude_pid)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    /// True if some process mentions `needle` and, case-insensitively,
    /// `agent_marker`.
    pub fn has_agent_for(&self, needle: &str, agent_marker: &str) -> bool {
        let marker = agent_marker.to_lowercase();
        self.entries.iter().any(|entry| {
            entry.command.contains(needle) && entry.command.to_lowercase().contains(&marker)
        })
    }
}

fn parse_ps_line(line: &str) -> Option<ProcessEntry> {
    let s = line.trim();
    let (pid, command) = match s.find(|c: char| c.is_ascii_whitespace()) {
        Some(ws) => (&s[..ws], s[ws..].trim_start()),
        None => (s, ""),
    };
    Some(ProcessEntry {
        pid: pid.parse().ok()?,
        command: command.to_string(),
    })
}

/// Live tmux windows as `session:index` tokens, in tmux order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionList {
    entries: Vec<String>,
}

impl SessionList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Parse newline-separated `session:index` output, skipping blanks.
    pub fn parse(output: &str) -> Self {
        Self::new(
            output
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry bound to window `index`.
    ///
    /// Matches on the `:<index>` suffix rather than splitting, since session
    /// names may themselves contain a colon.
    pub fn find_window(&self, index: &str) -> Option<&str> {
        let suffix = format!(":{index}");
        self.entries
            .iter()
            .find(|entry| entry.ends_with(&suffix))
            .map(String::as_str)
    }
}

/// Both probe results for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LivenessSnapshot {
    pub processes: ProcessSnapshot,
    pub sessions: SessionList,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS: &str = "\
  101 /usr/bin/zsh
  202 node /opt/bin/Claude --resume /home/me/vimwiki/wip/a.wiki
  303 vim /home/me/vimwiki/wip/b.wiki
  404 taskdash --wiki-path /home/me/vimwiki claude /home/me/vimwiki/wip/b.wiki
";

    #[test]
    fn parse_skips_headers_and_blanks() {
        let snap = ProcessSnapshot::parse("  PID COMMAND\n\n  7 sleep 10\n  8\n", 0);
        assert_eq!(
            snap.entries(),
            &[
                ProcessEntry { pid: 7, command: "sleep 10".into() },
                ProcessEntry { pid: 8, command: String::new() },
            ]
        );
    }

    #[test]
    fn agent_match_needs_path_and_marker() {
        let snap = ProcessSnapshot::parse(PS, 0);
        assert!(snap.has_agent_for("/home/me/vimwiki/wip/a.wiki", "claude"));
        // vim mentions b.wiki but is not the agent; pid 404 is both.
        assert!(snap.has_agent_for("/home/me/vimwiki/wip/b.wiki", "claude"));
        assert!(!snap.has_agent_for("/home/me/vimwiki/wip/c.wiki", "claude"));
        assert!(!snap.has_agent_for("/home/me/vimwiki/wip/a.wiki", "codex"));
    }

    #[test]
    fn own_pid_is_excluded() {
        let snap = ProcessSnapshot::parse(PS, 404);
        assert!(!snap.has_agent_for("/home/me/vimwiki/wip/b.wiki", "claude"));
        assert_eq!(snap.entries().len(), 3);
    }

    #[test]
    fn session_suffix_match() {
        let sessions = SessionList::parse("main:0\nwork:1\nweird:name:12\n\n");
        assert_eq!(sessions.entries().len(), 3);
        assert_eq!(sessions.find_window("1"), Some("work:1"));
        assert_eq!(sessions.find_window("12"), Some("weird:name:12"));
        assert_eq!(sessions.find_window("2"), None);
        assert!(SessionList::default().find_window("0").is_none());
    }
}
