//! Assembly of subject contexts for the three entry points of the security manager.

use std::sync::Arc;

use gatekeeper_security::context::SubjectContextBuilder;
use gatekeeper_security::{
    AuthenticationInfo, AuthenticationToken, Session, SessionId, Subject, SubjectContext, scope,
};
use security_manager_sdk::SessionError;
use tracing::{debug, trace};

use super::remembered::RememberedIdentity;
use super::session_resolver::SessionResolver;

/// Builds normalized [`SubjectContext`]s from the caller scope and collaborators.
#[derive(Clone)]
pub struct ContextBuilder {
    sessions: Arc<SessionResolver>,
    remembered: RememberedIdentity,
}

impl ContextBuilder {
    #[must_use]
    pub fn new(sessions: Arc<SessionResolver>, remembered: RememberedIdentity) -> Self {
        Self {
            sessions,
            remembered,
        }
    }

    /// Context for a caller that did not log in during this call.
    ///
    /// A live session carrying bound principals takes precedence; remembered
    /// identity is consulted only when there is no such session.
    pub async fn build_context_for_current_access(&self) -> SubjectContext {
        let context = self.sessions.resolve_session(&scoped_clues().build()).await;

        if context
            .session()
            .and_then(Session::bound_principals)
            .is_some()
        {
            debug!(
                session_id = ?context.session_id(),
                "Session carries bound principals, skipping remembered identity"
            );
            return context;
        }

        match self.remembered.remembered_identity().await {
            Some(principals) => {
                debug!(%principals, "Seeding context with remembered identity");
                context.with_principals(principals)
            }
            None => {
                trace!("No remembered identity for caller");
                context
            }
        }
    }

    /// Context describing a completed authentication.
    ///
    /// `existing` is the subject bound to the caller before the login, if any.
    pub async fn build_context_for_login(
        &self,
        token: AuthenticationToken,
        info: AuthenticationInfo,
        existing: Option<Arc<Subject>>,
    ) -> SubjectContext {
        let mut builder = scoped_clues();
        if let Some(host) = token.origin_host() {
            builder = builder.host(host);
        }
        builder = builder
            .authenticated(true)
            .authentication_token(token)
            .authentication_info(info);
        if let Some(subject) = existing {
            builder = builder.subject(subject);
        }

        self.sessions.resolve_session(&builder.build()).await
    }

    /// Context for an explicitly referenced session.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`]s from the session store, including
    /// `Invalid` and `AccessDenied`.
    pub async fn build_context_for_session_id(
        &self,
        session_id: &SessionId,
    ) -> Result<SubjectContext, SessionError> {
        let mut builder = SubjectContext::builder().session_id(session_id.clone());
        if let Some(host) = scope::current_host() {
            builder = builder.host(host);
        }
        self.sessions.resolve_session_strict(&builder.build()).await
    }
}

/// `SESSION_ID` and `HOST` as presented by the current caller scope.
fn scoped_clues() -> SubjectContextBuilder {
    let mut builder = SubjectContext::builder();
    if let Some(session_id) = scope::current_session_id() {
        builder = builder.session_id(session_id);
    }
    if let Some(host) = scope::current_host() {
        builder = builder.host(host);
    }
    builder
}
