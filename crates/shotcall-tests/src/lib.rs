//! Integration test crate for ShotCall.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, timeline and grid crates to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod grid;
