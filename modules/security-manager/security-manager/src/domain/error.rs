//! Domain errors for the security manager.

use security_manager_sdk::{AuthenticationError, SecurityManagerError, SessionError};

use super::binder::BindError;
use super::factory::FactoryError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("malformed subject context: {0}")]
    MalformedContext(#[from] FactoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BindError> for DomainError {
    fn from(e: BindError) -> Self {
        match e {
            BindError::Scope(scope) => {
                Self::Usage(format!("subject cannot be bound: {scope}"))
            }
            BindError::Session(session) => Self::Internal(session.to_string()),
        }
    }
}

impl From<DomainError> for SecurityManagerError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Usage(msg) => Self::Usage(msg),
            DomainError::Authentication(err) => Self::Authentication(err),
            DomainError::Session(err) => Self::Session(err),
            DomainError::MalformedContext(err) => Self::Internal(err.to_string()),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
