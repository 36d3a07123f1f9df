//! Folio Runtime - navigation orchestration and the carousel session
//!
//! - `NavigationController`: the only owner of navigation state. Resolves
//!   targets, consults the move policy, commits moves, drives the timers.
//! - `Carousel`: async session that serializes every controller call on one
//!   tokio task and turns timer deadlines into sleeps.
//! - `CarouselConfig` and tracing setup.

pub mod config;
pub mod controller;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use controller::*;
pub use session::*;
pub use telemetry::*;
