//! Pure construction of subjects from subject contexts.

use std::collections::BTreeSet;

use gatekeeper_security::{
    ContextKey, PrincipalCollection, Session, SessionId, Subject, SubjectContext,
};

/// A subject context that cannot be turned into a subject.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FactoryError {
    #[error("context asserts a completed authentication but carries no {missing}")]
    MissingAuthenticationData { missing: ContextKey },

    #[error("context carries {key} without asserting a completed authentication")]
    UnassertedAuthentication { key: ContextKey },

    #[error("authentication info carries no principals")]
    EmptyAuthenticationInfo,

    #[error("context session '{session}' does not match SESSION_ID '{session_id}'")]
    SessionMismatch {
        session: SessionId,
        session_id: SessionId,
    },

    #[error("unrecognized context key '{0}'")]
    UnrecognizedKey(String),
}

/// Builds an immutable [`Subject`] from a normalized [`SubjectContext`].
///
/// Implementations must not perform I/O.
pub trait SubjectFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`FactoryError`] for malformed contexts only.
    fn create_subject(&self, context: &SubjectContext) -> Result<Subject, FactoryError>;
}

/// Default factory applying the identity precedence
/// login info > context principals > session-bound principals > anonymous.
#[derive(Debug, Clone, Default)]
pub struct DefaultSubjectFactory {
    accepted_extensions: BTreeSet<String>,
}

impl DefaultSubjectFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the given extension keys in addition to the well-known ones.
    #[must_use]
    pub fn with_accepted_extensions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_extensions
            .extend(keys.into_iter().map(Into::into));
        self
    }

    fn validate(&self, context: &SubjectContext) -> Result<(), FactoryError> {
        if let Some(key) = context
            .extensions()
            .keys()
            .find(|key| !self.accepted_extensions.contains(*key))
        {
            return Err(FactoryError::UnrecognizedKey(key.clone()));
        }

        if context.authenticated() == Some(true) {
            if context.authentication_token().is_none() {
                return Err(FactoryError::MissingAuthenticationData {
                    missing: ContextKey::AuthenticationToken,
                });
            }
            match context.authentication_info() {
                None => {
                    return Err(FactoryError::MissingAuthenticationData {
                        missing: ContextKey::AuthenticationInfo,
                    });
                }
                Some(info) if info.principals().is_empty() => {
                    return Err(FactoryError::EmptyAuthenticationInfo);
                }
                Some(_) => {}
            }
        } else {
            for key in [ContextKey::AuthenticationToken, ContextKey::AuthenticationInfo] {
                if context.contains(key) {
                    return Err(FactoryError::UnassertedAuthentication { key });
                }
            }
        }

        if let (Some(session), Some(session_id)) = (context.session(), context.session_id())
            && session.id() != session_id
        {
            return Err(FactoryError::SessionMismatch {
                session: session.id().clone(),
                session_id: session_id.clone(),
            });
        }

        Ok(())
    }
}

impl SubjectFactory for DefaultSubjectFactory {
    fn create_subject(&self, context: &SubjectContext) -> Result<Subject, FactoryError> {
        self.validate(context)?;

        let authenticated = context.authenticated() == Some(true);

        Ok(Subject::builder()
            .principals(resolve_principals(context))
            .authenticated(authenticated)
            .session_id(resolve_session_reference(context))
            .host(resolve_host(context))
            .build())
    }
}

fn resolve_principals(context: &SubjectContext) -> PrincipalCollection {
    if let Some(info) = context.authentication_info() {
        return info.principals().clone();
    }
    if let Some(principals) = context.principals().filter(|p| !p.is_empty()) {
        return principals.clone();
    }
    context
        .session()
        .and_then(Session::bound_principals)
        .unwrap_or_default()
}

fn resolve_session_reference(context: &SubjectContext) -> Option<SessionId> {
    if let Some(session) = context.session() {
        return Some(session.id().clone());
    }
    // A SESSION_ID without SESSION means resolution found nothing usable.
    if context.session_id().is_some() {
        return None;
    }
    context
        .subject()
        .and_then(|subject| subject.session_id().cloned())
}

fn resolve_host(context: &SubjectContext) -> Option<String> {
    context
        .host()
        .or_else(|| {
            context
                .authentication_token()
                .and_then(|token| token.origin_host())
        })
        .or_else(|| context.subject().and_then(|subject| subject.host()))
        .map(str::to_owned)
}
