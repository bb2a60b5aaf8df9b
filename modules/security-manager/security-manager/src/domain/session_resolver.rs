//! Translation of session ids carried by a subject context into live sessions.

use std::sync::Arc;

use gatekeeper_security::{SessionId, SubjectContext};
use security_manager_sdk::{SessionError, SessionStore};
use tracing::{debug, trace, warn};

/// Hook invoked when a context references a stopped, expired or unknown session.
pub trait InvalidSessionListener: Send + Sync {
    fn on_invalid_session_id(&self, session_id: &SessionId);
}

/// Listener that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreInvalidSessions;

impl InvalidSessionListener for IgnoreInvalidSessions {
    fn on_invalid_session_id(&self, _session_id: &SessionId) {}
}

/// Resolves `SESSION_ID` clues into sessions through a [`SessionStore`].
pub struct SessionResolver {
    store: Arc<dyn SessionStore>,
    listener: Arc<dyn InvalidSessionListener>,
}

impl SessionResolver {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            listener: Arc::new(IgnoreInvalidSessions),
        }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn InvalidSessionListener>) -> Self {
        self.listener = listener;
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Attach the session referenced by the context's `SESSION_ID`, if it is live.
    ///
    /// Never fails: invalid ids notify the listener and every lookup failure
    /// degrades to a context without a session, so identity resolution can
    /// continue anonymously.
    pub async fn resolve_session(&self, context: &SubjectContext) -> SubjectContext {
        if context.session().is_some() {
            debug!("Context already contains a session, returning it unchanged");
            return context.clone();
        }

        let Some(session_id) = context.session_id() else {
            trace!("No session id in context, nothing to resolve");
            return context.clone();
        };

        match self.store.lookup(session_id).await {
            Ok(session) => context.with_session(session),
            Err(SessionError::Invalid { reason, .. }) => {
                self.listener.on_invalid_session_id(session_id);
                debug!(
                    %session_id,
                    %reason,
                    "Context references an invalid session id, continuing without a session"
                );
                context.clone()
            }
            Err(e @ SessionError::AccessDenied { .. }) => {
                warn!(
                    %session_id,
                    error = %e,
                    "Context references a session the caller may not use, continuing without a session"
                );
                context.clone()
            }
            Err(e) => {
                warn!(
                    %session_id,
                    error = %e,
                    "Session lookup failed, continuing without a session"
                );
                context.clone()
            }
        }
    }

    /// Like [`resolve_session`](Self::resolve_session) but propagates lookup failures.
    /// Invalid ids still notify the listener before the error is returned.
    ///
    /// # Errors
    ///
    /// Any [`SessionError`] returned by the store.
    pub async fn resolve_session_strict(
        &self,
        context: &SubjectContext,
    ) -> Result<SubjectContext, SessionError> {
        if context.session().is_some() {
            return Ok(context.clone());
        }
        let Some(session_id) = context.session_id() else {
            return Ok(context.clone());
        };

        match self.store.lookup(session_id).await {
            Ok(session) => Ok(context.with_session(session)),
            Err(e) => {
                if e.is_invalid() {
                    self.listener.on_invalid_session_id(session_id);
                }
                Err(e)
            }
        }
    }
}
