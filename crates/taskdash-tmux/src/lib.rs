//! taskdash-tmux: liveness probe IO boundary.
//! Subprocess execution with timeouts, tmux window listing/switching and
//! process table snapshots. No business logic.

pub mod error;
pub mod executor;
pub mod probe;
pub mod processes;
pub mod sessions;

pub use error::ProbeError;
pub use executor::{CommandRunner, DEFAULT_TIMEOUT, SubprocessRunner};
pub use probe::capture_liveness;
pub use processes::{PS_ARGS, process_table, snapshot_processes};
pub use sessions::{LIST_WINDOWS_FORMAT, Tmux};
