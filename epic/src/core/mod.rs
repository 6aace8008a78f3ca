//! Deterministic, pure logic shared by the epic tooling.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! text and records and return deterministic outputs suitable for tests.

pub mod dependencies;
pub mod grammar;
pub mod phase;
pub mod resolver;
pub mod state;
pub mod status;
pub mod types;
pub mod yolo;
