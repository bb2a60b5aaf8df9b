//! Local (in-process) client for the security manager.

use std::sync::Arc;

use async_trait::async_trait;
use gatekeeper_security::{AuthenticationToken, SessionId, Subject};
use security_manager_sdk::{SecurityManagerClient, SecurityManagerError};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed out by [`SecurityManagerModule::init`](crate::module::SecurityManagerModule::init).
pub struct SecurityManagerLocalClient {
    svc: Arc<Service>,
}

impl SecurityManagerLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> SecurityManagerError {
    match &e {
        // Expected outcomes of a login attempt or a stale session reference.
        DomainError::Authentication(_) | DomainError::Session(_) => {
            tracing::debug!(operation = op, error = %e, "security_manager call rejected");
        }
        DomainError::Usage(_) => {
            tracing::warn!(operation = op, error = %e, "security_manager called incorrectly");
        }
        DomainError::MalformedContext(_) | DomainError::Internal(_) => {
            tracing::error!(operation = op, error = ?e, "security_manager call failed");
        }
    }
    e.into()
}

#[async_trait]
impl SecurityManagerClient for SecurityManagerLocalClient {
    async fn login(&self, token: AuthenticationToken) -> Result<Arc<Subject>, SecurityManagerError> {
        self.svc
            .login(token)
            .await
            .map_err(|e| log_and_convert("login", e))
    }

    async fn logout(&self, subject: Option<&Subject>) -> Result<(), SecurityManagerError> {
        self.svc
            .logout(subject)
            .await
            .map_err(|e| log_and_convert("logout", e))
    }

    async fn subject(&self) -> Result<Arc<Subject>, SecurityManagerError> {
        self.svc
            .subject()
            .await
            .map_err(|e| log_and_convert("subject", e))
    }

    async fn subject_by_session_id(
        &self,
        session_id: &SessionId,
    ) -> Result<Subject, SecurityManagerError> {
        self.svc
            .subject_by_session_id(session_id)
            .await
            .map_err(|e| log_and_convert("subject_by_session_id", e))
    }
}
