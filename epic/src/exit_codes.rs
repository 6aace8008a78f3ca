//! Stable exit codes for the `epic` CLI.

/// Command ran and the tool succeeded.
pub const OK: i32 = 0;
/// Invalid invocation, unparsable tool call or config, or another fatal error.
pub const INVALID: i32 = 1;
/// The tool ran but reported a structured failure (`found: false`, `success: false`, `error`).
pub const FAILED: i32 = 2;
