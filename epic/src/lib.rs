//! Epic workflow tracking and autonomous continuation.
//!
//! An epic is a directory of markdown artifacts (spec, research, plan, tasks)
//! plus a small JSON `.state` record. This crate answers questions about
//! those artifacts and drives "yolo mode", where each idle signal from an
//! agent host decides whether to keep the agent working. The architecture
//! keeps a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (status and dependency grammar,
//!   availability, state merge, continuation decisions). No I/O.
//! - **[`io`]**: Filesystem access, prompt rendering, notifications and the
//!   session channel back to the host.
//!
//! Tool modules ([`list`], [`epic_status`], [`available`], [`context`]) and
//! the [`idle`] controller combine the two; [`tools`] maps JSON tool calls
//! onto them.

pub mod available;
pub mod context;
pub mod core;
pub mod epic_status;
pub mod exit_codes;
pub mod idle;
pub mod io;
pub mod list;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
