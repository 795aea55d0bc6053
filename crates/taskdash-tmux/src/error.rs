//! Error types for the probe boundary.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{program} failed: {detail}")]
    CommandFailed { program: String, detail: String },

    #[error("{program} timed out after {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("failed to spawn {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
