//! Desktop notifications with an ordered fallback chain.
//!
//! Notifications are a side channel: every failure is logged and swallowed,
//! and nothing here can change a decision made by the caller.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::io::config::{NotifierBackend, NotifyConfig};
use crate::io::process::run_command_with_timeout;

/// A short popup message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn name(&self) -> &'static str;
    fn notify(&self, notification: &Notification) -> Result<()>;
}

/// macOS Notification Center via `osascript`.
#[derive(Debug, Clone)]
pub struct OsascriptNotifier {
    pub timeout: Duration,
}

impl Notifier for OsascriptNotifier {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn notify(&self, notification: &Notification) -> Result<()> {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            applescript_escape(&notification.message),
            applescript_escape(&notification.title)
        );
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        run_checked(cmd, self.timeout, self.name())
    }
}

/// freedesktop notifications via `notify-send`.
#[derive(Debug, Clone)]
pub struct NotifySendNotifier {
    pub timeout: Duration,
}

impl Notifier for NotifySendNotifier {
    fn name(&self) -> &'static str {
        "notify-send"
    }

    fn notify(&self, notification: &Notification) -> Result<()> {
        let mut cmd = Command::new("notify-send");
        cmd.arg(&notification.title).arg(&notification.message);
        run_checked(cmd, self.timeout, self.name())
    }
}

/// Last resort: a log line. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, notification: &Notification) -> Result<()> {
        info!("[{}] {}", notification.title, notification.message);
        Ok(())
    }
}

/// Tries each notifier in order until one succeeds.
pub struct FallbackNotifier {
    chain: Vec<Box<dyn Notifier>>,
}

impl FallbackNotifier {
    pub fn new(chain: Vec<Box<dyn Notifier>>) -> Self {
        Self { chain }
    }

    /// Desktop backends from `config` (when enabled), then the log.
    pub fn from_config(config: &NotifyConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut chain: Vec<Box<dyn Notifier>> = Vec::new();
        if config.enabled {
            for backend in &config.backends {
                let notifier: Box<dyn Notifier> = match backend {
                    NotifierBackend::Osascript => Box::new(OsascriptNotifier { timeout }),
                    NotifierBackend::NotifySend => Box::new(NotifySendNotifier { timeout }),
                };
                chain.push(notifier);
            }
        }
        chain.push(Box::new(LogNotifier));
        Self::new(chain)
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|n| n.name()).collect()
    }
}

impl Notifier for FallbackNotifier {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn notify(&self, notification: &Notification) -> Result<()> {
        for notifier in &self.chain {
            match notifier.notify(notification) {
                Ok(()) => {
                    debug!(backend = notifier.name(), "notification delivered");
                    return Ok(());
                }
                Err(err) => {
                    debug!(backend = notifier.name(), err = %format!("{err:#}"), "notifier failed, trying next");
                }
            }
        }
        Err(anyhow!("no notifier accepted the notification"))
    }
}

/// Deliver `notification`, ignoring any failure.
pub fn notify_best_effort<N: Notifier + ?Sized>(notifier: &N, notification: &Notification) {
    if let Err(err) = notifier.notify(notification) {
        debug!(err = %format!("{err:#}"), title = %notification.title, "notification dropped");
    }
}

fn run_checked(cmd: Command, timeout: Duration, name: &str) -> Result<()> {
    let output = run_command_with_timeout(cmd, timeout)?;
    if output.success() {
        return Ok(());
    }
    if output.timed_out {
        return Err(anyhow!("{name} timed out after {timeout:?}"));
    }
    Err(anyhow!(
        "{name} exited with {:?}: {}",
        output.status.and_then(|s| s.code()),
        output.stderr.trim()
    ))
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
