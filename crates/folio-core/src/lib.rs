//! Folio Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout folio:
//! - Identifiers (PageId)
//! - Time primitives (SessionTime, interval normalisation)
//! - Ordered page sets and the cyclic/linear navigation rule
//! - Collaborator contracts (content provider, move policy, display sink)

pub mod id;
pub mod time;
pub mod page;
pub mod policy;
pub mod error;

pub use id::*;
pub use time::*;
pub use page::*;
pub use policy::*;
pub use error::*;
