//! Raw terminal mode as a scoped resource.

use std::io::{self, IsTerminal};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// RAII guard that restores the terminal to its normal state when dropped.
/// This ensures cleanup happens even on panic or early `?` returns.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switch the terminal to raw mode until the guard is dropped.
    pub fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Fail unless stdin is an interactive terminal.
pub fn require_interactive() -> anyhow::Result<()> {
    require_terminal(&io::stdin())
}

fn require_terminal(input: &impl IsTerminal) -> anyhow::Result<()> {
    if !input.is_terminal() {
        anyhow::bail!("taskdash requires an interactive terminal");
    }
    Ok(())
}
