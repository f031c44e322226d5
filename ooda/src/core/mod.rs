//! Deterministic, pure logic shared by the agents and the program space.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod cache;
pub mod parse;
pub mod types;
pub mod window;
