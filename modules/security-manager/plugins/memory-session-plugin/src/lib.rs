#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! In-Memory Session Store Plugin
//!
//! Keeps sessions in a concurrent map. Sessions expire after a configurable idle
//! period; stopped and expired sessions leave a tombstone so later lookups
//! report why the id is no longer valid. `sweep_expired` expires idle sessions
//! and drops tombstones older than the retention window.
//!
//! ## Configuration
//!
//! ```yaml
//! memory_session:
//!   idle_timeout_secs: 1800
//!   tombstone_retention_secs: 3600
//!   bind_to_host: true
//! ```
//!
//! With `bind_to_host`, a session created for one host cannot be looked up by a
//! caller scope presenting another host.

pub mod config;
pub mod domain;
pub mod module;

pub use domain::{Clock, ManualClock, MemorySessionStore, SystemClock};
pub use module::MemorySessionPlugin;
