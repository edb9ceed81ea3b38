//! Frame-update and collision core of a two-player arcade shooter.
//!
//! The library holds no I/O: `compute::tick` maps (world, input) to the next
//! world, `session::Session` wraps it for a host loop, and
//! `snapshot::RenderSnapshot` is what a renderer reads.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod session;
pub mod snapshot;
pub mod timers;
