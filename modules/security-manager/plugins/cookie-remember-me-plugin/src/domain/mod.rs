//! Domain layer for the cookie remember-me plugin.

pub mod client;
pub mod service;

pub use service::CookieRememberMe;
