//! Refresh loop: scan -> notify -> render -> wait, until the operator quits.
//!
//! Runs on a single task. The wait is one `select!` over the interval
//! deadline, the keyboard event stream and the shutdown signal; nothing
//! polls.

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::{Stream, StreamExt};
use taskdash_core::{
    ClassifiedTask, ClassifierConfig, LivenessSnapshot, SeenNotifications, scan_tasks,
};
use taskdash_tmux::{CommandRunner, Tmux, capture_liveness};

use crate::notifier::{NOTIFICATION_TITLE, NotificationSink};
use crate::render::render_dashboard;

/// Startup parameters resolved from the CLI.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Directory scanned for `*.wiki` task files.
    pub wip_dir: PathBuf,
    pub interval: Duration,
    pub classifier: ClassifierConfig,
    pub notifications: bool,
    /// Digit keys switch tmux windows only when running inside tmux.
    pub in_tmux: bool,
}

/// What a keypress asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Refresh,
    /// Switch to the window of the task at this 0-based index.
    Switch(usize),
    Ignore,
}

/// Map a key event to an action. Digits map to `Switch` only inside tmux.
pub fn key_action(key: &KeyEvent, in_tmux: bool) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char(c) if in_tmux => match c.to_digit(10) {
            Some(d) if d >= 1 => KeyAction::Switch(d as usize - 1),
            _ => KeyAction::Ignore,
        },
        _ => KeyAction::Ignore,
    }
}

enum WaitOutcome {
    Elapsed,
    Key(KeyAction),
    Shutdown,
}

/// Loop state: configuration, collaborators, and the one piece of state
/// that outlives a cycle (`seen`).
pub struct Dashboard<R, N> {
    config: DashboardConfig,
    tmux: Tmux<R>,
    notifier: N,
    seen: SeenNotifications,
    tasks: Vec<ClassifiedTask>,
    own_pid: u32,
}

impl<R: CommandRunner, N: NotificationSink> Dashboard<R, N> {
    pub fn new(config: DashboardConfig, tmux: Tmux<R>, notifier: N) -> Self {
        Self {
            config,
            tmux,
            notifier,
            seen: SeenNotifications::new(),
            tasks: Vec::new(),
            own_pid: std::process::id(),
        }
    }

    /// SCANNING: capture liveness once, reclassify every task file, then
    /// deliver notifications for newly raised attention alerts.
    pub async fn scan(&mut self) -> &[ClassifiedTask] {
        let liveness = if self.config.wip_dir.is_dir() {
            capture_liveness(&self.tmux, self.own_pid).await
        } else {
            LivenessSnapshot::default()
        };
        self.tasks = scan_tasks(
            &self.config.wip_dir,
            &liveness,
            &self.config.classifier,
            Local::now().naive_local(),
        );
        tracing::debug!(
            tasks = self.tasks.len(),
            sessions = liveness.sessions.entries().len(),
            "scan complete"
        );

        if self.config.notifications {
            for n in self.seen.reconcile(&self.tasks) {
                tracing::info!(path = %n.path.display(), alert = %n.message, "notifying");
                self.notifier
                    .deliver(NOTIFICATION_TITLE, &n.task_name, &n.message);
            }
        }
        &self.tasks
    }

    /// RENDERED: the current screen.
    pub fn render(&self) -> String {
        render_dashboard(
            &self.tasks,
            self.config.interval.as_secs(),
            self.config.in_tmux,
            Local::now().naive_local(),
        )
    }

    /// SWITCHING: select the tmux window bound to task `index`.
    ///
    /// No-op (returns `false`) when the index is out of range, the task has
    /// no window, or no live window matches.
    pub async fn switch_to_task(&self, index: usize) -> bool {
        let Some(window) = self
            .tasks
            .get(index)
            .and_then(|t| t.record.session_window.as_deref())
        else {
            return false;
        };
        let sessions = self.tmux.list_windows_or_empty().await;
        self.tmux.switch_to_window(window, &sessions).await
    }

    /// Run until quit, end of input, or `shutdown` resolves.
    ///
    /// The wait deadline is fixed per cycle: ignored keys and window
    /// switches resume waiting for the remaining time only.
    pub async fn run<W, S, F>(&mut self, out: &mut W, mut events: S, shutdown: F) -> io::Result<()>
    where
        W: Write,
        S: Stream<Item = io::Result<Event>> + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        'cycle: loop {
            self.scan().await;
            out.write_all(self.render().as_bytes())?;
            out.flush()?;

            let deadline = tokio::time::sleep(self.config.interval);
            tokio::pin!(deadline);

            loop {
                let outcome = tokio::select! {
                    () = &mut deadline => WaitOutcome::Elapsed,
                    () = &mut shutdown => WaitOutcome::Shutdown,
                    event = events.next() => match event {
                        Some(Ok(Event::Key(key))) => {
                            WaitOutcome::Key(key_action(&key, self.config.in_tmux))
                        }
                        Some(Ok(_)) => WaitOutcome::Key(KeyAction::Ignore),
                        Some(Err(e)) => return Err(e),
                        None => WaitOutcome::Shutdown,
                    },
                };

                match outcome {
                    WaitOutcome::Elapsed | WaitOutcome::Key(KeyAction::Refresh) => {
                        continue 'cycle;
                    }
                    WaitOutcome::Shutdown | WaitOutcome::Key(KeyAction::Quit) => {
                        tracing::info!("dashboard stopping");
                        return Ok(());
                    }
                    WaitOutcome::Key(KeyAction::Switch(index)) => {
                        let switched = self.switch_to_task(index).await;
                        tracing::debug!(index, switched, "window switch");
                    }
                    WaitOutcome::Key(KeyAction::Ignore) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use crate::notifier::tests::RecordingSink;
    use futures_util::stream;
    use taskdash_tmux::ProbeError;

    /// Answers tmux/ps from mutable scripts and logs every call.
    #[derive(Default)]
    struct FakeHost {
        calls: Mutex<Vec<String>>,
        windows: Mutex<Option<String>>,
        processes: Mutex<Option<String>>,
    }

    impl CommandRunner for FakeHost {
        fn run(
            &self,
            program: &str,
            args: &[&str],
        ) -> impl Future<Output = Result<String, ProbeError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{program} {}", args.join(" ")));
            let out = match program {
                "tmux" if args.first() == Some(&"select-window") => Some(String::new()),
                "tmux" => self.windows.lock().unwrap().clone(),
                "ps" => self.processes.lock().unwrap().clone(),
                _ => None,
            };
            std::future::ready(out.ok_or_else(|| ProbeError::CommandFailed {
                program: program.to_string(),
                detail: "not scripted".to_string(),
            }))
        }
    }

    fn config(wip: &Path, in_tmux: bool) -> DashboardConfig {
        DashboardConfig {
            wip_dir: wip.to_path_buf(),
            interval: Duration::from_secs(30),
            classifier: ClassifierConfig::new(10),
            notifications: true,
            in_tmux,
        }
    }

    fn wip_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    fn key(c: char) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    #[test]
    fn key_mapping() {
        let press = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(key_action(&press('q'), false), KeyAction::Quit);
        assert_eq!(key_action(&press('r'), false), KeyAction::Refresh);
        assert_eq!(key_action(&press('3'), true), KeyAction::Switch(2));
        assert_eq!(key_action(&press('3'), false), KeyAction::Ignore);
        assert_eq!(key_action(&press('0'), true), KeyAction::Ignore);
        assert_eq!(key_action(&press('x'), true), KeyAction::Ignore);
        assert_eq!(
            key_action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            KeyAction::Quit
        );
        let mut release = press('q');
        release.kind = KeyEventKind::Release;
        assert_eq!(key_action(&release, false), KeyAction::Ignore);
    }

    #[tokio::test]
    async fn persistent_alert_notifies_once() {
        let wip = wip_with(&[("a.wiki", "# Task Name: Alpha\n**Status**: In Progress\n")]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), false), Tmux::new(&host), &sink);

        dash.scan().await;
        dash.scan().await;

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(
            delivered.as_slice(),
            [(
                NOTIFICATION_TITLE.to_string(),
                "Alpha".to_string(),
                "NOT RUNNING".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn recurring_alert_notifies_again() {
        let wip = wip_with(&[("a.wiki", "# Task Name: Alpha\n**Status**: In Progress\n")]);
        let agent = format!("7 claude {}\n", wip.path().join("a.wiki").display());
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), false), Tmux::new(&host), &sink);

        dash.scan().await;
        *host.processes.lock().unwrap() = Some(agent);
        assert!(dash.scan().await[0].state.alerts.is_empty());
        *host.processes.lock().unwrap() = None;
        dash.scan().await;

        assert_eq!(sink.delivered.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn notifications_can_be_disabled() {
        let wip = wip_with(&[("a.wiki", "**Status**: blocked\n")]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut cfg = config(wip.path(), false);
        cfg.notifications = false;
        let mut dash = Dashboard::new(cfg, Tmux::new(&host), &sink);

        assert_eq!(dash.scan().await.len(), 1);
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn probes_run_once_per_cycle() {
        let wip = wip_with(&[
            ("a.wiki", "**Status**: x\n"),
            ("b.wiki", "**Status**: y\n"),
            ("c.wiki", "**Status**: z\n"),
        ]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), false), Tmux::new(&host), &sink);

        dash.scan().await;
        assert_eq!(host.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_directory_skips_probes() {
        let root = tempfile::tempdir().unwrap();
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(
            config(&root.path().join("wip"), false),
            Tmux::new(&host),
            &sink,
        );

        assert!(dash.scan().await.is_empty());
        assert!(host.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn switch_targets_bound_live_window() {
        let wip = wip_with(&[
            ("a.wiki", "**Tmux Window**: 4\n"),
            ("b.wiki", "**Status**: unbound\n"),
        ]);
        let host = FakeHost::default();
        *host.windows.lock().unwrap() = Some("work:4\n".into());
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), true), Tmux::new(&host), &sink);
        dash.scan().await;

        assert!(dash.switch_to_task(0).await);
        assert_eq!(
            host.calls.lock().unwrap().last().map(String::as_str),
            Some("tmux select-window -t work:4")
        );
        assert!(!dash.switch_to_task(1).await, "task without a window");
        assert!(!dash.switch_to_task(9).await, "index out of range");

        *host.windows.lock().unwrap() = Some("work:5\n".into());
        assert!(!dash.switch_to_task(0).await, "window no longer live");
    }

    #[tokio::test]
    async fn run_handles_refresh_then_quit() {
        let wip = wip_with(&[("a.wiki", "# Task Name: Alpha\n")]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), false), Tmux::new(&host), &sink);

        let events = stream::iter(vec![key('x'), key('r'), key('q')]);
        let mut out = Vec::new();
        dash.run(&mut out, events, std::future::pending()).await.unwrap();

        let screen = String::from_utf8(out).unwrap();
        assert_eq!(screen.matches("=== Task Dashboard ===").count(), 2);
        assert!(screen.contains("Alpha"));
        // NOT RUNNING persisted across the refresh: one notification.
        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_or_end_of_input() {
        let wip = wip_with(&[]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut dash = Dashboard::new(config(wip.path(), false), Tmux::new(&host), &sink);

        let mut out = Vec::new();
        dash.run(&mut out, stream::pending(), std::future::ready(()))
            .await
            .unwrap();
        dash.run(&mut out, stream::empty(), std::future::pending())
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().matches("No active tasks").count(),
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_rescans_when_interval_elapses() {
        let wip = wip_with(&[]);
        let host = FakeHost::default();
        let sink = RecordingSink::default();
        let mut cfg = config(wip.path(), false);
        cfg.interval = Duration::from_secs(1);
        let mut dash = Dashboard::new(cfg, Tmux::new(&host), &sink);

        let mut out = Vec::new();
        let shutdown = tokio::time::sleep(Duration::from_millis(2500));
        dash.run(&mut out, stream::pending(), shutdown).await.unwrap();

        // Scans at t=0, 1s and 2s.
        assert_eq!(String::from_utf8(out).unwrap().matches("=== Task Dashboard ===").count(), 3);
    }
}
