//! Security Manager Module
//!
//! Resolves the canonical [`Subject`](gatekeeper_security::Subject) of a caller
//! from its session, remembered identity and login state, binds it to the
//! caller scope and orchestrates login and logout.
//!
//! Provides the `SecurityManagerClient` implementation handed out by
//! [`module::SecurityManagerModule::init`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::SecurityManagerConfig;
pub use module::{Collaborators, SecurityManagerModule};
