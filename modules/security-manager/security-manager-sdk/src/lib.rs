//! Security Manager SDK
//!
//! This crate provides the public API for the `security_manager` module:
//!
//! - [`SecurityManagerClient`] - Public API trait for consumers
//! - [`Authenticator`], [`LogoutNotifier`], [`SessionStore`], [`RememberMeProvider`] -
//!   collaborator traits implemented by plugins
//! - [`SecurityManagerError`] and the collaborator error types
//!
//! ## Usage
//!
//! ```ignore
//! use security_manager_sdk::SecurityManagerClient;
//!
//! let subject = manager.login(AuthenticationToken::new("jsmith", password)).await?;
//! assert!(subject.is_authenticated());
//! ```

pub mod api;
pub mod error;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::SecurityManagerClient;
pub use error::{
    AuthenticationError, InvalidSessionReason, ProviderError, SecurityManagerError, SessionError,
};
pub use plugin_api::{Authenticator, LogoutNotifier, RememberMeProvider, SessionStore};
