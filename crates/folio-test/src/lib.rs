//! Folio Test Harness - deterministic simulation of navigation sessions
//!
//! This crate provides:
//! - Recording move policy and display sink
//! - Virtual-time carousel simulator
//! - Predefined scenarios

pub mod recording;
pub mod simulator;

pub use recording::*;
pub use simulator::*;
