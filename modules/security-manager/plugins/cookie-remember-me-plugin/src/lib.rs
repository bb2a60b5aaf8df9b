#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Cookie Remember-Me Plugin
//!
//! Remembers a subject's principals in a client-held cookie. The cookie value is
//! the versioned binary encoding of the principals followed by an HMAC-SHA256
//! tag, base64url encoded without padding.
//!
//! The inbound cookie is read from the current caller scope; updates are written
//! back to it and surface in `ScopeExit::remember_me` for the transport layer to
//! send to the client.
//!
//! ## Configuration
//!
//! ```yaml
//! cookie_remember_me:
//!   signing_key: "<base64, at least 32 bytes>"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use domain::CookieRememberMe;
pub use module::CookieRememberMePlugin;
