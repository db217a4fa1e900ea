//! labreq-audit
//!
//! Structured audit and diagnostic events. Every component reports through
//! this crate so the log shape stays uniform.

pub mod events;
