//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation node counts
//! - `analysis.rs` - Check, mate, pins, material and variant rules
//! - `castling.rs` - Standard and Fischer castling
//! - `drops.rs` - Crazyhouse and bughouse drops
//! - `proptest.rs` - Property-based tests

mod castling;
mod drops;
