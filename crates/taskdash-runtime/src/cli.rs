//! CLI definition using clap derive.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use taskdash_core::{ClassifierConfig, wip_dir};

use crate::context::{expand_home, inside_tmux};
use crate::refresh_loop::DashboardConfig;

#[derive(Parser, Debug)]
#[command(name = "taskdash", version, about = "Terminal dashboard for agent task files")]
pub struct Cli {
    /// Wiki root; task files live in <root>/wip/*.wiki
    #[arg(long, env = "TASKDASH_WIKI_PATH", default_value = "~/vimwiki")]
    pub wiki_path: String,

    /// Refresh interval in seconds
    #[arg(
        long,
        env = "TASKDASH_INTERVAL",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Minutes without an update before a task is flagged stale
    #[arg(long, env = "TASKDASH_STALE_MINUTES", default_value_t = 10)]
    pub stale_minutes: u32,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Case-insensitive substring identifying the agent process
    #[arg(long, env = "TASKDASH_AGENT_PATTERN", default_value = "claude")]
    pub agent_pattern: String,

    /// tmux socket path
    #[arg(long)]
    pub tmux_socket: Option<String>,

    /// Append logs to this file (filter: TASKDASH_LOG or RUST_LOG)
    #[arg(long, env = "TASKDASH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print one scan as JSON and exit
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Flatten the flags into the loop's configuration.
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            wip_dir: wip_dir(&expand_home(&self.wiki_path)),
            interval: Duration::from_secs(self.interval),
            classifier: ClassifierConfig::new(self.stale_minutes)
                .with_agent_marker(self.agent_pattern.clone()),
            notifications: !self.no_notifications && !self.json,
            in_tmux: inside_tmux(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["taskdash", "--wiki-path", "/srv/wiki"]).unwrap();
        assert_eq!(cli.interval, 30);
        assert_eq!(cli.stale_minutes, 10);
        assert_eq!(cli.agent_pattern, "claude");
        assert!(!cli.no_notifications);
        assert!(!cli.json);

        let config = cli.dashboard_config();
        assert_eq!(config.wip_dir, PathBuf::from("/srv/wiki/wip"));
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.classifier.stale_after, chrono::Duration::minutes(10));
        assert!(config.notifications);
    }

    #[test]
    fn custom_flags() {
        let cli = Cli::try_parse_from([
            "taskdash",
            "--wiki-path",
            "/srv/wiki",
            "--interval",
            "5",
            "--stale-minutes",
            "45",
            "--no-notifications",
            "--agent-pattern",
            "codex",
        ])
        .unwrap();
        let config = cli.dashboard_config();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.classifier.stale_after, chrono::Duration::minutes(45));
        assert_eq!(config.classifier.agent_marker, "codex");
        assert!(!config.notifications);
    }

    #[test]
    fn json_mode_never_notifies() {
        let cli = Cli::try_parse_from(["taskdash", "--json"]).unwrap();
        assert!(!cli.dashboard_config().notifications);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["taskdash", "--interval", "0"]).is_err());
    }
}
