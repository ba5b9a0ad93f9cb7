//! Guest network reconciler types
//!
//! Declarative input and result types shared by the guest-network controller
//! and its tests: the desired-state entry list, the device-type and state
//! keywords, and the flat adapter-facts result surface.

pub mod entry;
pub mod outcome;

pub use entry::*;
pub use outcome::*;
