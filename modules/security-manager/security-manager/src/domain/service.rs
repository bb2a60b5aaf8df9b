//! Login/logout orchestration and subject resolution.

use std::fmt;
use std::sync::Arc;

use gatekeeper_security::{AuthenticationToken, SessionId, Subject};
use security_manager_sdk::{
    Authenticator, LogoutNotifier, RememberMeProvider, SessionError, SessionStore,
};
use tracing::{debug, info, warn};

use super::binder::{ScopedSubjectBinder, SessionSubjectBinder, SubjectBinder};
use super::context_builder::ContextBuilder;
use super::error::DomainError;
use super::factory::{DefaultSubjectFactory, SubjectFactory};
use super::remembered::RememberedIdentity;
use super::session_resolver::{InvalidSessionListener, SessionResolver};
use crate::config::SecurityManagerConfig;

/// Lifecycle of a subject as seen by the orchestrator.
///
/// Recorded on the `state` field of the `login`/`logout` spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    Authenticating,
    AuthenticatedBound,
    LoggedOut,
}

impl LoginState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::AuthenticatedBound => "authenticated_bound",
            Self::LoggedOut => "logged_out",
        }
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn record_state(state: LoginState) {
    tracing::Span::current().record("state", state.as_str());
}

/// Security manager service.
///
/// Composes the authenticator, session resolution, remembered identity,
/// subject factory and subject binder into the public operations.
pub struct Service {
    authenticator: Arc<dyn Authenticator>,
    logout_notifier: Option<Arc<dyn LogoutNotifier>>,
    sessions: Arc<SessionResolver>,
    remembered: RememberedIdentity,
    contexts: ContextBuilder,
    factory: Arc<dyn SubjectFactory>,
    binder: Arc<dyn SubjectBinder>,
}

impl Service {
    /// Start building a service around the two mandatory collaborators.
    #[must_use]
    pub fn builder(
        authenticator: Arc<dyn Authenticator>,
        session_store: Arc<dyn SessionStore>,
    ) -> ServiceBuilder {
        ServiceBuilder {
            authenticator,
            session_store,
            logout_notifier: None,
            remember_me: None,
            invalid_session_listener: None,
            factory: None,
            binder: None,
            config: SecurityManagerConfig::default(),
        }
    }

    /// Authenticate `token`, then create and bind the authenticated subject.
    ///
    /// # Errors
    ///
    /// - `Authentication` with the authenticator's original cause
    /// - `Usage` when the subject cannot be bound to the caller
    /// - `MalformedContext` when the factory rejects the login context
    #[tracing::instrument(skip_all, fields(username = token.username(), state))]
    pub async fn login(&self, token: AuthenticationToken) -> Result<Arc<Subject>, DomainError> {
        record_state(LoginState::Authenticating);

        let info = match self.authenticator.authenticate(&token).await {
            Ok(info) => info,
            Err(e) => {
                info!(error = %e, "Authentication failed");
                self.remembered.on_failed_login(&token, &e).await;
                record_state(LoginState::Unauthenticated);
                return Err(e.into());
            }
        };

        self.remembered.on_successful_login(&token, &info).await;

        let existing = self.binder.current();
        let context = self
            .contexts
            .build_context_for_login(token, info, existing)
            .await;
        let subject = Arc::new(self.factory.create_subject(&context)?);
        self.binder.bind(Arc::clone(&subject)).await?;

        record_state(LoginState::AuthenticatedBound);
        info!(
            principals = %subject.principals(),
            session_id = ?subject.session_id(),
            "Login succeeded"
        );
        Ok(subject)
    }

    /// Log `subject` out.
    ///
    /// Remembered identity and logout notification are best-effort. Unbinding
    /// and session teardown are always attempted and their failures are only
    /// logged.
    ///
    /// # Errors
    ///
    /// - `Usage` if `subject` is `None`
    #[tracing::instrument(skip_all, fields(state))]
    pub async fn logout(&self, subject: Option<&Subject>) -> Result<(), DomainError> {
        let Some(subject) = subject else {
            return Err(DomainError::Usage(
                "logout requires a subject, none was given".to_owned(),
            ));
        };

        let principals = subject.principals();
        if !principals.is_empty() {
            debug!(
                principal = ?subject.primary_principal().map(ToString::to_string),
                "Logging out subject"
            );
            self.remembered.on_logout(principals).await;
            if let Some(notifier) = &self.logout_notifier
                && let Err(e) = notifier.on_logout(principals).await
            {
                warn!(
                    %principals,
                    error = %e,
                    "Logout notification failed, continuing logout"
                );
            }
        }

        if let Err(e) = self.binder.unbind(subject).await {
            debug!(error = %e, "Unable to cleanly unbind subject, ignoring (logging out)");
        }

        if let Some(session_id) = subject.session_id() {
            self.stop_session(session_id).await;
        }

        record_state(LoginState::LoggedOut);
        Ok(())
    }

    async fn stop_session(&self, session_id: &SessionId) {
        match self.sessions.store().stop(session_id).await {
            Ok(()) => debug!(%session_id, "Session stopped"),
            Err(e @ SessionError::Invalid { .. }) => {
                debug!(
                    %session_id,
                    error = %e,
                    "Session already invalid, nothing to stop (logging out)"
                );
            }
            Err(e) => {
                warn!(
                    %session_id,
                    error = %e,
                    "Unable to cleanly stop session, ignoring (logging out)"
                );
            }
        }
    }

    /// The subject bound to the caller; an ambient one is created and bound
    /// when nothing is bound yet.
    ///
    /// # Errors
    ///
    /// - `Usage` when the subject cannot be bound to the caller
    /// - `MalformedContext` when the factory rejects the ambient context
    #[tracing::instrument(skip_all)]
    pub async fn subject(&self) -> Result<Arc<Subject>, DomainError> {
        if let Some(subject) = self.binder.current() {
            return Ok(subject);
        }

        let context = self.contexts.build_context_for_current_access().await;
        let subject = Arc::new(self.factory.create_subject(&context)?);
        self.binder.bind(Arc::clone(&subject)).await?;

        debug!(
            anonymous = subject.is_anonymous(),
            session_id = ?subject.session_id(),
            "Bound ambient subject"
        );
        Ok(subject)
    }

    /// Subject for an explicitly referenced session. Not bound to the caller.
    ///
    /// # Errors
    ///
    /// - `Session` when the session is invalid or access to it is denied
    /// - `MalformedContext` when the factory rejects the context
    #[tracing::instrument(skip_all, fields(%session_id))]
    pub async fn subject_by_session_id(
        &self,
        session_id: &SessionId,
    ) -> Result<Subject, DomainError> {
        let context = self
            .contexts
            .build_context_for_session_id(session_id)
            .await?;
        Ok(self.factory.create_subject(&context)?)
    }

    /// The subject currently bound to the caller, without creating one.
    #[must_use]
    pub fn bound_subject(&self) -> Option<Arc<Subject>> {
        self.binder.current()
    }
}

/// Builder for [`Service`].
pub struct ServiceBuilder {
    authenticator: Arc<dyn Authenticator>,
    session_store: Arc<dyn SessionStore>,
    logout_notifier: Option<Arc<dyn LogoutNotifier>>,
    remember_me: Option<Arc<dyn RememberMeProvider>>,
    invalid_session_listener: Option<Arc<dyn InvalidSessionListener>>,
    factory: Option<Arc<dyn SubjectFactory>>,
    binder: Option<Arc<dyn SubjectBinder>>,
    config: SecurityManagerConfig,
}

impl ServiceBuilder {
    #[must_use]
    pub fn remember_me(mut self, provider: Arc<dyn RememberMeProvider>) -> Self {
        self.remember_me = Some(provider);
        self
    }

    #[must_use]
    pub fn logout_notifier(mut self, notifier: Arc<dyn LogoutNotifier>) -> Self {
        self.logout_notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn invalid_session_listener(mut self, listener: Arc<dyn InvalidSessionListener>) -> Self {
        self.invalid_session_listener = Some(listener);
        self
    }

    /// Replace the default subject factory.
    #[must_use]
    pub fn subject_factory(mut self, factory: Arc<dyn SubjectFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Replace the binder otherwise chosen from the configuration.
    #[must_use]
    pub fn subject_binder(mut self, binder: Arc<dyn SubjectBinder>) -> Self {
        self.binder = Some(binder);
        self
    }

    #[must_use]
    pub fn config(mut self, config: &SecurityManagerConfig) -> Self {
        self.config = config.clone();
        self
    }

    #[must_use]
    pub fn build(self) -> Service {
        let mut resolver = SessionResolver::new(Arc::clone(&self.session_store));
        if let Some(listener) = self.invalid_session_listener {
            resolver = resolver.with_listener(listener);
        }
        let sessions = Arc::new(resolver);
        let remembered = RememberedIdentity::new(self.remember_me);

        let factory = self.factory.unwrap_or_else(|| {
            Arc::new(
                DefaultSubjectFactory::new()
                    .with_accepted_extensions(self.config.accepted_context_extensions.clone()),
            )
        });

        let binder: Arc<dyn SubjectBinder> = match self.binder {
            Some(binder) => binder,
            None if self.config.bind_principals_to_session => {
                Arc::new(SessionSubjectBinder::new(self.session_store))
            }
            None => Arc::new(ScopedSubjectBinder),
        };

        Service {
            authenticator: self.authenticator,
            logout_notifier: self.logout_notifier,
            contexts: ContextBuilder::new(Arc::clone(&sessions), remembered.clone()),
            sessions,
            remembered,
            factory,
            binder,
        }
    }
}
