#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Authenticator Plugin
//!
//! This plugin verifies username/password tokens against a static account table
//! for development and testing.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any token with a non-empty username and
//!   password. The username becomes the only principal.
//!
//! - **`static_accounts`**: Accepts only the configured accounts. Useful for E2E
//!   tests with distinct users, locked accounts and extra principals.
//!
//! The plugin also acts as a logout notifier and records every logout it sees.
//!
//! ## Configuration
//!
//! ```yaml
//! static_authn:
//!   mode: static_accounts
//!   realm: "static"
//!   accounts:
//!     - username: "jsmith"
//!       password: "secret"
//!       principals: ["jsmith@example.com"]
//!     - username: "locked"
//!       password: "secret"
//!       locked: true
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::StaticAuthnPlugin;
