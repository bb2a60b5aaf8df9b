//! Domain layer for the static authenticator plugin.

pub mod client;
pub mod service;

pub use service::Service;
