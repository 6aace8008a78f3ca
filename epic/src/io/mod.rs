//! I/O helpers for epic commands.

pub mod artifacts;
pub mod config;
pub mod notify;
pub mod paths;
pub mod process;
pub mod prompt;
pub mod session;
pub mod state_store;
