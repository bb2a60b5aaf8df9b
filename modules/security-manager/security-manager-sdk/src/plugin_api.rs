//! Collaborator traits consumed by the security manager.
//!
//! Plugins implement these to supply credential verification, session storage
//! and remember-me persistence. The manager holds them as `Arc<dyn …>` and
//! awaits each call before moving on.

use async_trait::async_trait;
use gatekeeper_security::{
    AuthenticationInfo, AuthenticationToken, PrincipalCollection, Session, SessionId,
};

use crate::error::{AuthenticationError, ProviderError, SessionError};

/// Verifies submitted credentials against an identity source.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate `token` and return the matching account's principals.
    ///
    /// # Errors
    ///
    /// - `UnknownAccount` / `IncorrectCredentials` / `LockedAccount` for bad credentials
    /// - `UnsupportedToken` if the token cannot be handled
    /// - `Failed` for backend errors
    async fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> Result<AuthenticationInfo, AuthenticationError>;
}

/// Optional strategy notified when a subject with principals logs out.
///
/// Configured on the manager explicitly; authenticators that also need logout
/// notifications are registered a second time under this trait.
#[async_trait]
pub trait LogoutNotifier: Send + Sync {
    /// # Errors
    ///
    /// Any error is logged by the manager and otherwise ignored.
    async fn on_logout(&self, principals: &PrincipalCollection) -> Result<(), ProviderError>;
}

/// Server-side session storage.
///
/// Implementations must be safe for concurrent lookup and stop by id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a live session and record the access.
    ///
    /// # Errors
    ///
    /// - `Invalid` if the session is stopped, expired or unknown
    /// - `AccessDenied` if the current caller may not reference it
    /// - `Internal` for store failures
    async fn lookup(&self, id: &SessionId) -> Result<Session, SessionError>;

    /// Stop a session so that later lookups fail with `Invalid`.
    ///
    /// # Errors
    ///
    /// - `Invalid` if the session is already stopped, expired or unknown
    async fn stop(&self, id: &SessionId) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Same classes as [`lookup`](Self::lookup).
    async fn set_attribute(
        &self,
        id: &SessionId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Same classes as [`lookup`](Self::lookup).
    async fn remove_attribute(&self, id: &SessionId, key: &str) -> Result<(), SessionError>;
}

/// Persists identities across sessions ("remember me").
///
/// Every method is best-effort from the manager's point of view: errors are
/// logged and swallowed. A process-wide provider must be safe for concurrent use.
#[async_trait]
pub trait RememberMeProvider: Send + Sync {
    /// Principals remembered for the current caller, if any.
    ///
    /// # Errors
    ///
    /// Any failure reading or decoding the persisted identity.
    async fn remembered_principals(&self) -> Result<Option<PrincipalCollection>, ProviderError>;

    /// # Errors
    ///
    /// Any failure persisting the identity.
    async fn on_successful_login(
        &self,
        token: &AuthenticationToken,
        info: &AuthenticationInfo,
    ) -> Result<(), ProviderError>;

    /// # Errors
    ///
    /// Any failure forgetting the identity.
    async fn on_failed_login(
        &self,
        token: &AuthenticationToken,
        error: &AuthenticationError,
    ) -> Result<(), ProviderError>;

    /// # Errors
    ///
    /// Any failure forgetting the identity.
    async fn on_logout(&self, principals: &PrincipalCollection) -> Result<(), ProviderError>;
}
