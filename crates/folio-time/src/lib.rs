//! Folio Time - timed components of the navigation core
//!
//! This crate implements the timed state machines and their clock:
//! - AutoAdvanceTimer: single pending one-shot tick, manually re-armed
//! - InteractionDebouncer: pause on interaction, resume after a quiet period
//! - SessionClock: maps a monotonic instant to session time
//!
//! Neither state machine sleeps or spawns. Each exposes `next_deadline()` and
//! `poll(now)`, and the owner decides how time passes.

pub mod clock;
pub mod debounce;
pub mod timer;

pub use clock::*;
pub use debounce::*;
pub use timer::*;
