//! Error types for the security manager and its collaborators.

use std::fmt;

use gatekeeper_security::SessionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication failures raised by an [`Authenticator`](crate::Authenticator).
///
/// `login` returns these to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No account matches the submitted username.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// The account exists but the credentials do not match.
    #[error("incorrect credentials for account '{0}'")]
    IncorrectCredentials(String),

    /// The account exists but may not log in.
    #[error("account '{0}' is locked")]
    LockedAccount(String),

    /// The authenticator cannot process this kind of token.
    #[error("unsupported token: {0}")]
    UnsupportedToken(String),

    /// Any other failure of the authentication backend.
    #[error("authentication failed: {0}")]
    Failed(String),
}

/// Why a session id no longer resolves to a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidSessionReason {
    Unknown,
    Stopped,
    Expired,
}

impl fmt::Display for InvalidSessionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown session id",
            Self::Stopped => "session was stopped",
            Self::Expired => "session expired",
        })
    }
}

/// Errors raised by a [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session was stopped, expired, or never existed.
    #[error("session '{id}' is invalid: {reason}")]
    Invalid {
        id: SessionId,
        reason: InvalidSessionReason,
    },

    /// The caller may not reference this session.
    #[error("access to session '{id}' denied: {reason}")]
    AccessDenied { id: SessionId, reason: String },

    /// The backing store failed.
    #[error("session store failure: {0}")]
    Internal(String),
}

impl SessionError {
    #[must_use]
    pub fn invalid(id: SessionId, reason: InvalidSessionReason) -> Self {
        Self::Invalid { id, reason }
    }

    #[must_use]
    pub fn access_denied(id: SessionId, reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            id,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

/// Failure of a best-effort collaborator (remember-me provider, logout notifier).
///
/// The security manager logs these and never lets them change the outcome of
/// the surrounding operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderError(String);

impl ProviderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors returned by the public [`SecurityManagerClient`](crate::SecurityManagerClient) API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityManagerError {
    /// The API was called with an invalid argument.
    #[error("usage error: {0}")]
    Usage(String),

    /// Login failed; carries the authenticator's original cause.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// An explicitly requested session could not be used.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
