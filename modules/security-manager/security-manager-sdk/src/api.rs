//! Public API trait for the security manager.
//!
//! Applications and the authorization/interception layer consume this trait;
//! the `security-manager` crate implements it.

use std::sync::Arc;

use async_trait::async_trait;
use gatekeeper_security::{AuthenticationToken, SessionId, Subject};

use crate::error::SecurityManagerError;

/// Public API trait for the security manager.
///
/// Every call runs against the current caller scope:
///
/// ```ignore
/// let exit = CallerScope::new()
///     .session_id(session_id)
///     .run(async {
///         let subject = manager.login(token).await?;
///         // ...
///         manager.logout(Some(&subject)).await
///     })
///     .await;
/// ```
#[async_trait]
pub trait SecurityManagerClient: Send + Sync {
    /// Authenticate `token`, bind the resulting subject to the caller and return it.
    ///
    /// # Errors
    ///
    /// - `Authentication` with the authenticator's original cause
    /// - `Usage` if no caller scope is active
    /// - `Internal` for unexpected errors
    async fn login(&self, token: AuthenticationToken) -> Result<Arc<Subject>, SecurityManagerError>;

    /// Log `subject` out: forget remembered identity, unbind it and stop its session.
    ///
    /// Side-effect failures are logged, never returned.
    ///
    /// # Errors
    ///
    /// - `Usage` if `subject` is `None`
    async fn logout(&self, subject: Option<&Subject>) -> Result<(), SecurityManagerError>;

    /// The subject bound to the caller, creating and binding one from ambient
    /// clues (session, remembered identity) when none is bound yet.
    ///
    /// # Errors
    ///
    /// - `Usage` if no caller scope is active
    /// - `Internal` for unexpected errors
    async fn subject(&self) -> Result<Arc<Subject>, SecurityManagerError>;

    /// Build a subject for an explicitly referenced session. Does not bind it.
    ///
    /// # Errors
    ///
    /// - `Session` if the session is invalid or access to it is denied
    /// - `Internal` for unexpected errors
    async fn subject_by_session_id(
        &self,
        session_id: &SessionId,
    ) -> Result<Subject, SecurityManagerError>;
}
