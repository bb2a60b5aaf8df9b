//! Association of subjects with the current caller scope.

use std::sync::Arc;

use async_trait::async_trait;
use gatekeeper_security::constants::{AUTHENTICATED_SESSION_KEY, PRINCIPALS_SESSION_KEY};
use gatekeeper_security::{ScopeError, Subject, scope};
use security_manager_sdk::{SessionError, SessionStore};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("failed to update session of bound subject: {0}")]
    Session(#[from] SessionError),
}

/// Binds subjects to the current logical caller.
#[async_trait]
pub trait SubjectBinder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`BindError::Scope`] when no caller scope is active.
    async fn bind(&self, subject: Arc<Subject>) -> Result<(), BindError>;

    /// Safe to call when nothing is bound.
    ///
    /// # Errors
    ///
    /// Implementation-specific cleanup failures.
    async fn unbind(&self, subject: &Subject) -> Result<(), BindError>;

    fn current(&self) -> Option<Arc<Subject>>;
}

/// Keeps the subject in the task-local caller scope only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedSubjectBinder;

#[async_trait]
impl SubjectBinder for ScopedSubjectBinder {
    async fn bind(&self, subject: Arc<Subject>) -> Result<(), BindError> {
        scope::bind_subject(subject)?;
        Ok(())
    }

    async fn unbind(&self, _subject: &Subject) -> Result<(), BindError> {
        scope::unbind_subject();
        Ok(())
    }

    fn current(&self) -> Option<Arc<Subject>> {
        scope::bound_subject()
    }
}

/// Caller-scope binding that also records the subject's identity in its session.
///
/// Later callers presenting the same session id then resolve the same principals
/// without a remember-me lookup.
pub struct SessionSubjectBinder {
    sessions: Arc<dyn SessionStore>,
}

impl SessionSubjectBinder {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    async fn write_identity(&self, subject: &Subject) -> Result<(), SessionError> {
        let Some(session_id) = subject.session_id() else {
            return Ok(());
        };
        if subject.principals().is_empty() {
            return Ok(());
        }

        let principals = serde_json::to_value(subject.principals())
            .map_err(|e| SessionError::Internal(e.to_string()))?;
        self.sessions
            .set_attribute(session_id, PRINCIPALS_SESSION_KEY, principals)
            .await?;
        if subject.is_authenticated() {
            self.sessions
                .set_attribute(
                    session_id,
                    AUTHENTICATED_SESSION_KEY,
                    serde_json::Value::Bool(true),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectBinder for SessionSubjectBinder {
    async fn bind(&self, subject: Arc<Subject>) -> Result<(), BindError> {
        scope::bind_subject(Arc::clone(&subject))?;

        // The caller-scope binding is authoritative; the session copy is best-effort.
        if let Err(e) = self.write_identity(&subject).await {
            warn!(
                session_id = ?subject.session_id(),
                error = %e,
                "Unable to record subject identity in its session"
            );
        }
        Ok(())
    }

    async fn unbind(&self, subject: &Subject) -> Result<(), BindError> {
        scope::unbind_subject();

        let Some(session_id) = subject.session_id() else {
            return Ok(());
        };
        debug!(%session_id, "Removing subject identity from session");

        // Both keys are attempted; the first failure is reported.
        let principals = self
            .sessions
            .remove_attribute(session_id, PRINCIPALS_SESSION_KEY)
            .await;
        let authenticated = self
            .sessions
            .remove_attribute(session_id, AUTHENTICATED_SESSION_KEY)
            .await;
        principals.and(authenticated)?;
        Ok(())
    }

    fn current(&self) -> Option<Arc<Subject>> {
        scope::bound_subject()
    }
}
