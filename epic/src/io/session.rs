//! Channel back into the host's agent session.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// Delivers a text instruction into a host session.
pub trait SessionSink {
    fn send(&self, session_id: &str, text: &str) -> Result<()>;
}

/// One instruction line as written by [`StdoutSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage<'a> {
    pub session_id: &'a str,
    pub text: &'a str,
}

/// Writes each instruction as a JSON line on stdout for a host hook to forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl SessionSink for StdoutSink {
    fn send(&self, session_id: &str, text: &str) -> Result<()> {
        let line = serde_json::to_string(&SessionMessage { session_id, text })
            .context("serialize session message")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").context("write session message")?;
        stdout.flush().context("flush stdout")
    }
}
