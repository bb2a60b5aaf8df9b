use serde::{Deserialize, Serialize};

use crate::principal::{Principal, PrincipalCollection};
use crate::session::SessionId;

/// `Subject` is the resolved identity of one logical caller.
///
/// Built by a subject factory from a `SubjectContext` and immutable afterwards.
/// A subject can carry principals without being authenticated (remembered or
/// session-bound identity); `authenticated` is only set by a successful login
/// in the same call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    principals: PrincipalCollection,
    authenticated: bool,
    /// Session reference. The subject never owns the session lifecycle.
    session_id: Option<SessionId>,
    host: Option<String>,
}

impl Subject {
    #[must_use]
    pub fn builder() -> SubjectBuilder {
        SubjectBuilder::default()
    }

    /// A subject with no identity, no session and no host.
    #[must_use]
    pub fn anonymous() -> Self {
        SubjectBuilder::default().build()
    }

    #[must_use]
    pub fn principals(&self) -> &PrincipalCollection {
        &self.principals
    }

    #[must_use]
    pub fn primary_principal(&self) -> Option<&Principal> {
        self.principals.primary()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Known identity that was not proven in this session (remembered or session-bound).
    #[must_use]
    pub fn is_remembered(&self) -> bool {
        !self.authenticated && !self.principals.is_empty()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.principals.is_empty()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

#[derive(Default)]
pub struct SubjectBuilder {
    principals: PrincipalCollection,
    authenticated: bool,
    session_id: Option<SessionId>,
    host: Option<String>,
}

impl SubjectBuilder {
    #[must_use]
    pub fn principals(mut self, principals: PrincipalCollection) -> Self {
        self.principals = principals;
        self
    }

    #[must_use]
    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    #[must_use]
    pub fn session_id(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }

    #[must_use]
    pub fn host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn build(self) -> Subject {
        Subject {
            principals: self.principals,
            authenticated: self.authenticated,
            session_id: self.session_id,
            host: self.host,
        }
    }
}
